use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::image_pipeline::color::{Gamma, WhiteBalanceReference};
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::plane::{Plane, SensorArray};
use crate::image_pipeline::conversions::raw_to_rgb::RawToRgbPipeline;
use crate::image_pipeline::conversions::types::DecodeConfig;
use crate::image_pipeline::debayer::ColorImage;
use crate::image_pipeline::export::{ImageWriter, OutputFormat, StandardImageWriter};
use crate::image_pipeline::raw::{RawImageData, RawImageReader};

#[derive(Debug, Clone, PartialEq)]
enum Written {
    Gray(usize, usize),
    Rgb(usize, usize),
}

struct MockReader {
    should_fail: bool,
    mock_data: Option<RawImageData>,
}

impl MockReader {
    fn with_size(width: usize, height: usize) -> Self {
        let data = (0..width * height).map(|i| ((i * 37) % 1000) as u16).collect();
        Self {
            should_fail: false,
            mock_data: Some(RawImageData {
                width,
                height,
                data,
                bits_per_sample: 12,
                cfa: "RGGB".to_string(),
            }),
        }
    }
}

impl RawImageReader for MockReader {
    fn read_raw(&self, _data: &[u8]) -> Result<RawImageData> {
        if self.should_fail {
            return Err(ConversionError::DecodeError("Mock decode error".to_string()));
        }
        self.mock_data
            .clone()
            .ok_or_else(|| ConversionError::DecodeError("no mock data".to_string()))
    }
}

struct MockWriter {
    should_fail: bool,
    written_data: Arc<Mutex<Vec<Written>>>,
}

impl MockWriter {
    fn new() -> (Self, Arc<Mutex<Vec<Written>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                should_fail: false,
                written_data: written.clone(),
            },
            written,
        )
    }
}

impl ImageWriter for MockWriter {
    fn extension(&self) -> &str {
        ".mock"
    }

    fn write_gray(&self, image: &Plane, output: &mut dyn Write) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::EncodeError("Mock encode error".to_string()));
        }
        output.write_all(b"gray")?;
        self.written_data.lock().unwrap().push(Written::Gray(image.width, image.height));
        Ok(())
    }

    fn write_rgb(&self, image: &ColorImage, output: &mut dyn Write) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::EncodeError("Mock encode error".to_string()));
        }
        output.write_all(b"rgb")?;
        self.written_data.lock().unwrap().push(Written::Rgb(image.width, image.height));
        Ok(())
    }
}

fn neutral_config() -> DecodeConfig {
    DecodeConfig::builder()
        .white_reference(WhiteBalanceReference::GainTriple { r: 1.0, g: 1.0, b: 1.0 })
        .build()
}

fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_develop_mid_gray_sensor() {
    let (writer, _) = MockWriter::new();
    let config = DecodeConfig::builder()
        .white_reference(WhiteBalanceReference::GainTriple { r: 1.0, g: 1.0, b: 1.0 })
        .gamma(Gamma::new(0.5).unwrap())
        .build();
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(4, 4), writer, config);

    let sensor = SensorArray::filled(4, 4, 0.5);
    let developed = pipeline.develop(&sensor).unwrap();

    for row in 1..3 {
        for col in 1..3 {
            let demosaiced = developed.demosaiced.pixel(row, col).unwrap();
            let balanced = developed.white_balanced.pixel(row, col).unwrap();
            let corrected = developed.gamma_corrected.pixel(row, col).unwrap();
            for c in 0..3 {
                assert!((demosaiced[c] - 0.5).abs() < 1e-6);
                assert_eq!(balanced[c], demosaiced[c]);
                assert!((corrected[c] - 0.70710677).abs() < 1e-6);
            }
        }
    }
    assert!(developed.white_balanced.data.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_successful_conversion_writes_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let (writer, written) = MockWriter::new();
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(8, 6), writer, neutral_config());

    let timings = pipeline.convert(b"fake raw data", dir.path()).unwrap();

    assert_eq!(
        file_names(dir.path()),
        vec![
            "01_scene_raw.mock",
            "02_red.mock",
            "03_green.mock",
            "04_blue.mock",
            "05_demosaiced.mock",
            "06_wb.mock",
            "07_gamma.mock",
        ]
    );

    let written = written.lock().unwrap();
    assert_eq!(written[0], Written::Gray(8, 6));
    assert!(written[1..].iter().all(|w| *w == Written::Rgb(8, 6)));
    assert_eq!(written.len(), 7);

    for step in ["decode_raw", "normalize", "demosaic", "white_balance", "gamma_correction", "write"] {
        assert!(timings.get_step(step).is_some(), "missing timing for {step}");
    }
}

#[test]
fn test_final_only_conversion() {
    let dir = tempfile::tempdir().unwrap();
    let (writer, written) = MockWriter::new();
    let config = DecodeConfig::builder()
        .white_reference(WhiteBalanceReference::GainTriple { r: 1.0, g: 1.0, b: 1.0 })
        .write_intermediates(false)
        .build();
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(4, 4), writer, config);

    pipeline.convert(b"fake raw data", dir.path()).unwrap();

    assert_eq!(file_names(dir.path()), vec!["07_gamma.mock"]);
    assert_eq!(written.lock().unwrap().len(), 1);
}

#[test]
fn test_output_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("results").join("run1");
    let (writer, _) = MockWriter::new();
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(4, 4), writer, neutral_config());

    pipeline.convert(b"fake raw data", &nested).unwrap();

    assert!(nested.join("07_gamma.mock").exists());
}

#[test]
fn test_reader_failure() {
    let dir = tempfile::tempdir().unwrap();
    let (writer, written) = MockWriter::new();
    let reader = MockReader { should_fail: true, mock_data: None };
    let pipeline = RawToRgbPipeline::with_custom(reader, writer, neutral_config());

    let result = pipeline.convert(b"fake raw data", dir.path());

    assert!(matches!(result.unwrap_err(), ConversionError::DecodeError(_)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_writer_failure() {
    let dir = tempfile::tempdir().unwrap();
    let writer = MockWriter {
        should_fail: true,
        written_data: Arc::new(Mutex::new(Vec::new())),
    };
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(4, 4), writer, neutral_config());

    let result = pipeline.convert(b"fake raw data", dir.path());

    assert!(matches!(result.unwrap_err(), ConversionError::EncodeError(_)));
}

#[test]
fn test_odd_dimensions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (writer, written) = MockWriter::new();
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(5, 4), writer, neutral_config());

    let result = pipeline.convert(b"fake raw data", dir.path());

    assert!(matches!(result.unwrap_err(), ConversionError::InvalidDimensions(5, 4)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn test_odd_dimensions_still_fail_without_validation() {
    let dir = tempfile::tempdir().unwrap();
    let (writer, _) = MockWriter::new();
    let config = DecodeConfig::builder()
        .white_reference(WhiteBalanceReference::GainTriple { r: 1.0, g: 1.0, b: 1.0 })
        .validate_dimensions(false)
        .build();
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(4, 3), writer, config);

    let result = pipeline.convert(b"fake raw data", dir.path());

    assert!(matches!(result.unwrap_err(), ConversionError::InvalidDimensions(4, 3)));
}

#[test]
fn test_black_reference_pixel_fails_development() {
    let (writer, _) = MockWriter::new();
    let config = DecodeConfig::builder()
        .white_reference(WhiteBalanceReference::PixelReference { row: 1, col: 1 })
        .build();
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(4, 4), writer, config);

    let result = pipeline.develop(&SensorArray::zeros(4, 4));

    assert!(matches!(result.unwrap_err(), ConversionError::DegenerateGain { .. }));
}

#[test]
fn test_reference_outside_sensor_fails_development() {
    let (writer, _) = MockWriter::new();
    let pipeline = RawToRgbPipeline::with_custom(
        MockReader::with_size(4, 4),
        writer,
        DecodeConfig::default(),
    );

    let result = pipeline.develop(&SensorArray::filled(4, 4, 0.5));

    assert!(matches!(
        result.unwrap_err(),
        ConversionError::OutOfBounds { row: 1200, col: 230, .. }
    ));
}

#[test]
fn test_pixel_reference_neutralizes_reference_pixel() {
    let (writer, _) = MockWriter::new();
    let config = DecodeConfig::builder()
        .white_reference(WhiteBalanceReference::PixelReference { row: 3, col: 2 })
        .build();
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(4, 4), writer, config);

    let data = (0..64).map(|i| 0.1 + 0.8 * i as f32 / 64.0).collect();
    let sensor = SensorArray::from_vec(8, 8, data).unwrap();
    let developed = pipeline.develop(&sensor).unwrap();

    for value in developed.white_balanced.pixel(3, 2).unwrap() {
        assert!((value - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_unsupported_extension() {
    let config = DecodeConfig::builder().extension(".xyz").build();
    assert!(matches!(
        RawToRgbPipeline::new(config),
        Err(ConversionError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = RawToRgbPipeline::new(DecodeConfig::default()).unwrap();

    let result = pipeline.convert_file(dir.path().join("missing.dng"), dir.path().join("out"));

    assert!(matches!(result.unwrap_err(), ConversionError::InputReadError(_)));
}

#[test]
fn test_png_stage_images_decode() {
    let dir = tempfile::tempdir().unwrap();
    let writer = StandardImageWriter::new(OutputFormat::Raster(image::ImageFormat::Png));
    let pipeline = RawToRgbPipeline::with_custom(MockReader::with_size(6, 4), writer, neutral_config());

    pipeline.convert(b"fake raw data", dir.path()).unwrap();

    let raw = image::open(dir.path().join("01_scene_raw.png")).unwrap();
    assert_eq!(raw.color(), image::ColorType::L8);
    let red = image::open(dir.path().join("02_red.png")).unwrap().to_rgb8();
    assert_eq!(red.dimensions(), (6, 4));
    assert!(red.pixels().all(|p| p.0[1] == 0 && p.0[2] == 0));
    let last = image::open(dir.path().join("07_gamma.png")).unwrap();
    assert_eq!(last.color(), image::ColorType::Rgb8);
}
