//! Exif removal command

use clap::ArgMatches;
use log::info;

use crate::api::ExifKit;
use crate::commands::command_traits::Command;
use crate::commands::rewrite_paths;
use crate::exif::errors::ExifResult;
use crate::utils::logger::Logger;

/// Command for copying a JPEG without its Exif segments
pub struct StripCommand<'a> {
    input_file: String,
    output_file: String,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> StripCommand<'a> {
    /// Create a new strip command
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ExifResult<Self> {
        let (input_file, output_file) = rewrite_paths(args)?;
        Ok(StripCommand { input_file, output_file, logger })
    }
}

impl<'a> Command for StripCommand<'a> {
    fn execute(&self) -> ExifResult<()> {
        info!("Stripping Exif metadata from {}", self.input_file);

        ExifKit::default().strip(&self.input_file, &self.output_file)?;

        self.logger.log(&format!("Wrote {} without Exif metadata", self.output_file))?;
        println!("Saved {}", self.output_file);
        Ok(())
    }
}
