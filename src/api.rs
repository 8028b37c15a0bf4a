use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::exif::encoder::EncodeOptions;
use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::types::ExifDocument;
use crate::jpeg;
use crate::report::{dump_document, PhotoReport};

/// Main interface to the ExifKit library
///
/// Wraps the in-memory codec with file reads and writes. Files are read
/// whole and closed before decoding; outputs are written in one call
/// after the new stream has been built.
pub struct ExifKit {
    options: EncodeOptions,
}

impl Default for ExifKit {
    fn default() -> Self {
        ExifKit::new(EncodeOptions::default())
    }
}

impl ExifKit {
    /// Create a new ExifKit instance
    ///
    /// # Arguments
    /// * `options` - Layout options used whenever Exif data is written
    pub fn new(options: EncodeOptions) -> Self {
        ExifKit { options }
    }

    fn read_file(path: &str) -> ExifResult<Vec<u8>> {
        info!("Reading {}", path);
        fs::read(Path::new(path)).map_err(ExifError::from)
    }

    fn write_file(path: &str, data: &[u8]) -> ExifResult<()> {
        info!("Writing {} bytes to {}", data.len(), path);
        fs::write(Path::new(path), data).map_err(ExifError::from)
    }

    /// Decode the Exif metadata of a JPEG file
    ///
    /// Non-fatal decoding issues are logged as warnings.
    pub fn read(&self, input_path: &str) -> ExifResult<ExifDocument> {
        let data = Self::read_file(input_path)?;
        let (doc, issues) = ExifDocument::load_with_issues(&data)?;
        for issue in &issues {
            warn!("{}: {}", input_path, issue);
        }
        Ok(doc)
    }

    /// Build the metadata report of a JPEG file
    pub fn analyze(&self, input_path: &str) -> ExifResult<PhotoReport> {
        let doc = self.read(input_path)?;
        Ok(PhotoReport::from_document(&doc))
    }

    /// List every tag of a JPEG file
    pub fn dump(&self, input_path: &str) -> ExifResult<String> {
        let doc = self.read(input_path)?;
        Ok(dump_document(&doc))
    }

    /// Write a document into a copy of a JPEG file
    ///
    /// # Arguments
    /// * `input_path` - JPEG providing the image data and other segments
    /// * `output_path` - Where to write the result
    /// * `doc` - Metadata replacing any existing Exif segment
    pub fn write(&self, input_path: &str, output_path: &str, doc: &ExifDocument) -> ExifResult<()> {
        let data = Self::read_file(input_path)?;
        let payload = doc.dump_with(&self.options)?;
        let output = jpeg::insert(&payload, &data)?;
        Self::write_file(output_path, &output)
    }

    /// Copy a JPEG file with its GPS position replaced
    pub fn set_gps(&self, input_path: &str, output_path: &str, latitude: f64, longitude: f64) -> ExifResult<()> {
        let mut doc = self.read(input_path)?;
        doc.set_gps_coordinates(latitude, longitude)?;
        self.write(input_path, output_path, &doc)
    }

    /// Copy a JPEG file without its Exif metadata
    pub fn strip(&self, input_path: &str, output_path: &str) -> ExifResult<()> {
        let data = Self::read_file(input_path)?;
        let output = jpeg::remove(&data)?;
        Self::write_file(output_path, &output)
    }
}
