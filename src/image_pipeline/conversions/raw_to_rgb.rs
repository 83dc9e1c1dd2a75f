use tracing::{debug, info, instrument};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::image_pipeline::{
    color::{gamma_correct, white_balance},
    common::{
        error::{ConversionError, Result},
        plane::SensorArray,
    },
    conversions::{
        timing::{PipelineTimings, Timer},
        types::{DecodeConfig, DevelopedImage, Stage, StageImage},
    },
    debayer::{BilinearDebayer, Channel, ColorImage},
    export::{ImageWriter, OutputFormat, StandardImageWriter},
    raw::{normalize, RawImageReader, RawLoaderReader},
};

/// Develops a RAW capture into an RGB image: normalize, demosaic, white
/// balance, gamma. Every stage image can be written out for inspection.
pub struct RawToRgbPipeline<R: RawImageReader, W: ImageWriter> {
    reader: R,
    writer: W,
    config: DecodeConfig,
}

impl RawToRgbPipeline<RawLoaderReader, StandardImageWriter> {
    /// Uses rawloader for decoding and picks the writer from `config.extension`.
    pub fn new(config: DecodeConfig) -> Result<Self> {
        let format = OutputFormat::from_extension(&config.extension, config.tiff_compression)?;
        Ok(Self {
            reader: RawLoaderReader,
            writer: StandardImageWriter::with_extension(format, &config.extension),
            config,
        })
    }
}

impl<R: RawImageReader, W: ImageWriter> RawToRgbPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: DecodeConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    /// Runs the stages strictly in order, handing each checkpoint to `on_stage`.
    fn run(
        &self,
        sensor: &SensorArray,
        timings: &mut PipelineTimings,
        on_stage: &mut dyn FnMut(Stage, StageImage<'_>) -> Result<()>,
    ) -> Result<DevelopedImage> {
        on_stage(Stage::SceneRaw, StageImage::Gray(sensor))?;

        let debayer = BilinearDebayer::new(self.config.border);
        let demosaiced = {
            let _span = tracing::info_span!("demosaic").entered();
            let timer = Timer::start("demosaic");
            let masked = debayer.masked_channels(sensor)?;
            let interpolated = debayer.interpolate(&masked)?;
            timings.record(timer);

            for (channel, plane) in Channel::ALL.into_iter().zip(&masked) {
                on_stage(Stage::Masked(channel), StageImage::Channel(plane, channel))?;
            }
            interpolated
        };
        on_stage(Stage::Demosaiced, StageImage::Rgb(&demosaiced))?;

        let white_balanced = {
            let _span = tracing::info_span!("white_balance").entered();
            let timer = Timer::start("white_balance");
            let image = white_balance(&demosaiced, &self.config.white_reference)?;
            timings.record(timer);
            image
        };
        on_stage(Stage::WhiteBalanced, StageImage::Rgb(&white_balanced))?;

        let gamma_corrected = {
            let _span = tracing::info_span!("gamma_correction").entered();
            let timer = Timer::start("gamma_correction");
            let image = gamma_correct(&white_balanced, self.config.gamma.value())?;
            timings.record(timer);
            image
        };
        on_stage(Stage::GammaCorrected, StageImage::Rgb(&gamma_corrected))?;

        Ok(DevelopedImage {
            demosaiced,
            white_balanced,
            gamma_corrected,
        })
    }

    /// Demosaics, white balances and gamma corrects an already normalized sensor array.
    #[instrument(skip(self, sensor), fields(width = sensor.width, height = sensor.height))]
    pub fn develop(&self, sensor: &SensorArray) -> Result<DevelopedImage> {
        self.validate_dimensions(sensor.width, sensor.height)?;
        self.run(sensor, &mut PipelineTimings::new(), &mut |_, _| Ok(()))
    }

    fn write_stage(&self, output_dir: &Path, stage: Stage, image: StageImage<'_>) -> Result<()> {
        let path = output_dir.join(format!("{}{}", stage.file_stem(), self.writer.extension()));
        let _span = tracing::info_span!("write_stage", path = %path.display()).entered();

        let file = std::fs::File::create(&path).map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        let mut output = BufWriter::new(file);

        match image {
            StageImage::Gray(plane) => self.writer.write_gray(plane, &mut output)?,
            StageImage::Channel(plane, channel) => {
                let visual = ColorImage::from_single_channel(plane, channel);
                self.writer.write_rgb(&visual, &mut output)?
            }
            StageImage::Rgb(rgb) => self.writer.write_rgb(rgb, &mut output)?,
        }
        output.flush()?;

        debug!("Wrote {}", path.display());
        Ok(())
    }

    #[instrument(skip(self, input_data, output_dir), fields(input_size = input_data.len()))]
    pub fn convert(&self, input_data: &[u8], output_dir: &Path) -> Result<PipelineTimings> {
        info!("Starting RAW development");
        let mut timings = PipelineTimings::new();

        let raw_image = {
            let _span = tracing::info_span!("decode_raw").entered();
            let timer = Timer::start("decode_raw");
            let raw_image = self.reader.read_raw(input_data)?;
            timings.record(timer);
            raw_image
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = raw_image.width,
                height = raw_image.height
            ).entered();
            self.validate_dimensions(raw_image.width, raw_image.height)?;
        }

        let sensor = {
            let _span = tracing::info_span!("normalize").entered();
            let timer = Timer::start("normalize");
            let sensor = normalize(&raw_image)?;
            timings.record(timer);
            sensor
        };

        std::fs::create_dir_all(output_dir).map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", output_dir.display(), e))
        })?;

        let write_intermediates = self.config.write_intermediates;
        let mut write_time = PipelineTimings::new();
        self.run(&sensor, &mut timings, &mut |stage, image| {
            if !write_intermediates && stage != Stage::GammaCorrected {
                return Ok(());
            }
            let timer = Timer::start("write");
            self.write_stage(output_dir, stage, image)?;
            write_time.record(timer);
            Ok(())
        })?;

        if let Some(duration) = write_time.get_step("write") {
            timings.add_step("write", duration);
        }
        timings.log_summary();

        info!(
            width = raw_image.width,
            height = raw_image.height,
            "Development complete"
        );
        Ok(timings)
    }

    #[instrument(skip(self, input_path, output_dir))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
    ) -> Result<PipelineTimings> {
        let input_path = input_path.as_ref();
        let output_dir = output_dir.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_dir.display(),
            "Developing file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        self.convert(&input_data, output_dir)
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}
