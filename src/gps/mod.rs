//! GPS helpers
//!
//! Conversion between Exif DMS rationals and decimal degrees, plus
//! formatting of the GPS measurements found in photos.

pub mod coordinate;
pub mod format;

pub use coordinate::{decimal_to_dms, dms_to_decimal, GpsCoordinate};
pub use format::{degrees_to_direction, format_altitude, format_direction_ref, format_speed_ref};
