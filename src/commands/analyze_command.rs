//! Photo metadata analysis command
//!
//! Prints the metadata report, or the full tag listing, of one or more
//! JPEG files.

use clap::ArgMatches;
use log::{error, info};

use crate::api::ExifKit;
use crate::commands::command_traits::Command;
use crate::commands::input_files;
use crate::exif::errors::{ExifError, ExifResult};
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// Command for reporting the metadata of JPEG files
pub struct AnalyzeCommand<'a> {
    /// Paths to the input files
    input_files: Vec<String>,
    /// List every tag instead of the summary
    dump: bool,
    /// Include the tag listing after the summary
    verbose: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> AnalyzeCommand<'a> {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new AnalyzeCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> ExifResult<Self> {
        Ok(AnalyzeCommand {
            input_files: input_files(args)?,
            dump: args.get_flag("dump"),
            verbose: args.get_flag("verbose"),
            logger,
        })
    }

    /// Builds the text printed for one file
    fn describe(&self, kit: &ExifKit, path: &str) -> ExifResult<String> {
        if self.dump {
            return kit.dump(path);
        }

        let report = kit.analyze(path)?.to_string();
        if self.verbose {
            Ok(format!("{}\nAll tags\n--------\n{}", report, kit.dump(path)?))
        } else {
            Ok(report)
        }
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn execute(&self) -> ExifResult<()> {
        let kit = ExifKit::default();
        let multiple = self.input_files.len() > 1;
        let progress = if multiple {
            ProgressTracker::new(self.input_files.len() as u64, "Analyzing photos")
        } else {
            ProgressTracker::hidden()
        };

        let mut failures = 0;
        for path in &self.input_files {
            progress.set_message(path);
            match self.describe(&kit, path) {
                Ok(text) => {
                    if multiple {
                        progress.println(&format!("==> {} <==", path));
                    }
                    progress.println(&text);
                    self.logger.log(&format!("{}\n{}", path, text))?;
                }
                Err(e) => {
                    error!("Failed to analyze {}: {}", path, e);
                    failures += 1;
                }
            }
            progress.increment(1);
        }
        progress.finish();

        info!("Analyzed {} of {} files", self.input_files.len() - failures, self.input_files.len());
        if failures > 0 {
            return Err(ExifError::GenericError(format!("{} file(s) could not be analyzed", failures)));
        }
        Ok(())
    }
}
