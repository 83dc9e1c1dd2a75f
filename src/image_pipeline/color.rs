//! Color correction stages applied after demosaicing.

pub mod gamma;
pub mod white_balance;

pub use gamma::{gamma_correct, Gamma};
pub use white_balance::{white_balance, WhiteBalanceReference};
