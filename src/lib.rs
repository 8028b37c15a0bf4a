pub mod io;
pub mod exif;
pub mod jpeg;
pub mod gps;
pub mod report;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::ExifKit;

pub use exif::{EncodeOptions, ExifDocument, ExifError, ExifResult, IfdKind, Rational, SRational, TagValue};
pub use gps::GpsCoordinate;
pub use io::byte_order::ByteOrder;
pub use report::PhotoReport;
