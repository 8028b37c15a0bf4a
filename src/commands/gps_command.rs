//! GPS rewriting command

use clap::ArgMatches;
use log::info;

use crate::api::ExifKit;
use crate::commands::command_traits::Command;
use crate::commands::{encode_options, rewrite_paths};
use crate::exif::encoder::EncodeOptions;
use crate::exif::errors::{ExifError, ExifResult};
use crate::utils::coordinate_utils::parse_coordinate_pair;
use crate::utils::logger::Logger;

/// Command for writing a new GPS position into a copy of a JPEG
pub struct GpsCommand<'a> {
    input_file: String,
    output_file: String,
    latitude: f64,
    longitude: f64,
    options: EncodeOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> GpsCommand<'a> {
    /// Create a new GPS command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ExifResult<Self> {
        let (input_file, output_file) = rewrite_paths(args)?;
        let pair = args.get_one::<String>("set-gps")
            .ok_or_else(|| ExifError::GenericError("Missing coordinates".to_string()))?;
        let (latitude, longitude) = parse_coordinate_pair(pair)?;

        Ok(GpsCommand {
            input_file,
            output_file,
            latitude,
            longitude,
            options: encode_options(args),
            logger,
        })
    }
}

impl<'a> Command for GpsCommand<'a> {
    fn execute(&self) -> ExifResult<()> {
        info!("Setting GPS position of {} to {}, {}", self.input_file, self.latitude, self.longitude);

        ExifKit::new(self.options)
            .set_gps(&self.input_file, &self.output_file, self.latitude, self.longitude)?;

        self.logger.log(&format!("Wrote {} with GPS position {}, {}",
                                 self.output_file, self.latitude, self.longitude))?;
        println!("Saved {}", self.output_file);
        Ok(())
    }
}
