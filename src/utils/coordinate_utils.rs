//! Coordinate utility functions
//!
//! Parses the "latitude,longitude" pairs given on the command line. Each
//! component is a signed decimal degree value, optionally followed by a
//! hemisphere letter (N/S for latitude, E/W for longitude) which replaces
//! the sign.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::exif::errors::{ExifError, ExifResult};

lazy_static! {
    static ref COORDINATE_PAIR: Regex = Regex::new(
        r"^\s*([+-]?\d+(?:\.\d+)?)\s*([NnSs])?\s*,\s*([+-]?\d+(?:\.\d+)?)\s*([EeWw])?\s*$"
    ).expect("coordinate pattern is valid");
}

fn apply_hemisphere(value: f64, hemisphere: Option<&str>, negative: char) -> ExifResult<f64> {
    match hemisphere {
        None => Ok(value),
        Some(_) if value < 0.0 => Err(ExifError::InvalidValue(
            "a hemisphere letter cannot be combined with a negative value".to_string())),
        Some(letter) if letter.eq_ignore_ascii_case(&negative.to_string()) => Ok(-value),
        Some(_) => Ok(value),
    }
}

/// Parse a coordinate pair such as "37.2343,-115.8067" or "37.2343N,115.8067W"
///
/// # Returns
/// The latitude and longitude in signed decimal degrees. Range checks are
/// left to the GPS setter.
pub fn parse_coordinate_pair(text: &str) -> ExifResult<(f64, f64)> {
    let captures = COORDINATE_PAIR.captures(text).ok_or_else(|| ExifError::InvalidValue(
        format!("'{}' is not a coordinate pair, expected LAT,LON", text)))?;

    let number = |index: usize| -> ExifResult<f64> {
        captures[index].parse::<f64>()
            .map_err(|e| ExifError::InvalidValue(format!("{}: {}", &captures[index], e)))
    };

    let latitude = apply_hemisphere(number(1)?, captures.get(2).map(|m| m.as_str()), 'S')?;
    let longitude = apply_hemisphere(number(3)?, captures.get(4).map(|m| m.as_str()), 'W')?;

    debug!("Parsed coordinate pair '{}' as ({}, {})", text, latitude, longitude);
    Ok((latitude, longitude))
}
