//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod analyze_command;
pub mod gps_command;
pub mod strip_command;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use gps_command::GpsCommand;
pub use strip_command::StripCommand;

use clap::ArgMatches;
use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::encoder::EncodeOptions;
use crate::io::byte_order::ByteOrder;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
pub struct ExifkitCommandFactory;

impl ExifkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        ExifkitCommandFactory
    }
}

impl Default for ExifkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for ExifkitCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> ExifResult<Box<dyn Command + 'a>> {
        if args.contains_id("set-gps") {
            Ok(Box::new(GpsCommand::new(args, logger)?))
        } else if args.get_flag("strip") {
            Ok(Box::new(StripCommand::new(args, logger)?))
        } else {
            // Default to analyze command
            Ok(Box::new(AnalyzeCommand::new(args, logger)?))
        }
    }
}

/// Input paths given on the command line
pub(crate) fn input_files(args: &ArgMatches) -> ExifResult<Vec<String>> {
    let inputs: Vec<String> = args.get_many::<String>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if inputs.is_empty() {
        return Err(ExifError::GenericError("Missing input file".to_string()));
    }
    Ok(inputs)
}

/// The single input and the output path of a rewriting command
pub(crate) fn rewrite_paths(args: &ArgMatches) -> ExifResult<(String, String)> {
    let mut inputs = input_files(args)?;
    if inputs.len() > 1 {
        return Err(ExifError::GenericError(
            "Rewriting metadata takes exactly one input file".to_string()));
    }

    let output = args.get_one::<String>("output")
        .ok_or_else(|| ExifError::GenericError("Missing output file (use --output)".to_string()))?
        .clone();

    Ok((inputs.remove(0), output))
}

/// Encoding options selected on the command line
pub(crate) fn encode_options(args: &ArgMatches) -> EncodeOptions {
    if args.get_flag("little-endian") {
        EncodeOptions { byte_order: ByteOrder::LittleEndian }
    } else {
        EncodeOptions::default()
    }
}
