//! GPS coordinate conversion
//!
//! Exif stores latitude and longitude as three unsigned rationals
//! (degrees, minutes, seconds) plus a hemisphere reference letter. This
//! module converts between that form and signed decimal degrees.

use std::fmt;

use log::debug;

use crate::exif::constants::gps_tags;
use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::rational::Rational;
use crate::exif::types::{ExifDocument, IfdKind, TagValue};

/// Denominator used for the seconds component
pub const SECONDS_SCALE: u32 = 100;

/// GPS version written alongside new coordinates
pub const GPS_VERSION: [u8; 4] = [2, 2, 0, 0];

/// Converts a degrees/minutes/seconds triple to decimal degrees
pub fn dms_to_decimal(dms: &[Rational]) -> ExifResult<f64> {
    if dms.len() != 3 {
        return Err(ExifError::InvalidValue(format!("DMS value needs 3 rationals, got {}", dms.len())));
    }

    let degrees = dms[0].to_f64()?;
    let minutes = dms[1].to_f64()?;
    let seconds = dms[2].to_f64()?;

    Ok(degrees + minutes / 60.0 + seconds / 3600.0)
}

/// Converts decimal degrees to a degrees/minutes/seconds triple
///
/// The sign is dropped; it belongs in the reference tag. Degrees and
/// minutes are whole numbers over 1, seconds are rounded to hundredths.
/// Rounding up to 60 seconds carries into the minutes (and degrees).
pub fn decimal_to_dms(value: f64) -> ExifResult<Vec<Rational>> {
    if !value.is_finite() {
        return Err(ExifError::InvalidRational(format!("{} is not a finite coordinate", value)));
    }

    let value = value.abs();
    if value > u32::MAX as f64 {
        return Err(ExifError::InvalidRational(format!("{} degrees is out of range", value)));
    }

    let mut degrees = value.trunc() as u32;
    let minutes_f = (value - degrees as f64) * 60.0;
    let mut minutes = minutes_f.trunc() as u32;
    let mut seconds = ((minutes_f - minutes as f64) * 60.0 * SECONDS_SCALE as f64).round() as u32;

    if seconds >= 60 * SECONDS_SCALE {
        seconds -= 60 * SECONDS_SCALE;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        degrees += 1;
    }

    Ok(vec![
        Rational::new(degrees, 1),
        Rational::new(minutes, 1),
        Rational::new(seconds, SECONDS_SCALE),
    ])
}

/// Hemisphere sign for a reference letter
fn reference_sign(reference: &str, positive: char, negative: char) -> ExifResult<f64> {
    match reference.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
        Some(c) if c == positive => Ok(1.0),
        Some(c) if c == negative => Ok(-1.0),
        _ => Err(ExifError::InvalidValue(format!(
            "reference '{}' is neither {} nor {}", reference, positive, negative
        ))),
    }
}

fn as_dms(value: &TagValue) -> ExifResult<&[Rational]> {
    value.as_rationals()
        .ok_or_else(|| ExifError::InvalidValue(format!("GPS coordinate stored as {}", value)))
}

fn as_reference(value: &TagValue) -> ExifResult<&str> {
    value.as_ascii()
        .ok_or_else(|| ExifError::InvalidValue(format!("GPS reference stored as {}", value)))
}

/// A position in signed decimal degrees (north and east positive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinate {
    /// Creates a coordinate, checking that it lies on the globe
    pub fn new(latitude: f64, longitude: f64) -> ExifResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ExifError::InvalidValue(format!("latitude {} is outside [-90, 90]", latitude)));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ExifError::InvalidValue(format!("longitude {} is outside [-180, 180]", longitude)));
        }
        Ok(GpsCoordinate { latitude, longitude })
    }

    /// Builds a coordinate from Exif DMS triples and reference letters
    pub fn from_dms(latitude: &[Rational], latitude_ref: &str, longitude: &[Rational], longitude_ref: &str) -> ExifResult<Self> {
        let lat = reference_sign(latitude_ref, 'N', 'S')? * dms_to_decimal(latitude)?;
        let lon = reference_sign(longitude_ref, 'E', 'W')? * dms_to_decimal(longitude)?;
        GpsCoordinate::new(lat, lon)
    }

    /// Reference letter for the latitude
    pub fn latitude_ref(&self) -> &'static str {
        if self.latitude < 0.0 { "S" } else { "N" }
    }

    /// Reference letter for the longitude
    pub fn longitude_ref(&self) -> &'static str {
        if self.longitude < 0.0 { "W" } else { "E" }
    }

    /// Google Maps link for this position
    pub fn map_url(&self) -> String {
        format!("https://www.google.com/maps?q={},{}", self.latitude, self.longitude)
    }
}

impl fmt::Display for GpsCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {} {}",
               self.latitude.abs(), self.latitude_ref(), self.longitude.abs(), self.longitude_ref())
    }
}

impl ExifDocument {
    /// Reads the GPS position
    ///
    /// # Returns
    /// `None` when any of the four latitude/longitude tags is missing
    pub fn gps_coordinates(&self) -> ExifResult<Option<GpsCoordinate>> {
        let tags = (
            self.get(IfdKind::Gps, gps_tags::GPS_LATITUDE),
            self.get(IfdKind::Gps, gps_tags::GPS_LATITUDE_REF),
            self.get(IfdKind::Gps, gps_tags::GPS_LONGITUDE),
            self.get(IfdKind::Gps, gps_tags::GPS_LONGITUDE_REF),
        );

        let (lat, lat_ref, lon, lon_ref) = match tags {
            (Some(lat), Some(lat_ref), Some(lon), Some(lon_ref)) => (lat, lat_ref, lon, lon_ref),
            _ => return Ok(None),
        };

        GpsCoordinate::from_dms(as_dms(lat)?, as_reference(lat_ref)?, as_dms(lon)?, as_reference(lon_ref)?).map(Some)
    }

    /// Writes a GPS position, replacing any existing one
    ///
    /// Also sets GPSVersionID when the document has none.
    pub fn set_gps_coordinates(&mut self, latitude: f64, longitude: f64) -> ExifResult<()> {
        let position = GpsCoordinate::new(latitude, longitude)?;
        debug!("Setting GPS position to {}", position);

        self.set(IfdKind::Gps, gps_tags::GPS_LATITUDE, TagValue::Rational(decimal_to_dms(position.latitude)?))?;
        self.set(IfdKind::Gps, gps_tags::GPS_LATITUDE_REF, TagValue::ascii(position.latitude_ref()))?;
        self.set(IfdKind::Gps, gps_tags::GPS_LONGITUDE, TagValue::Rational(decimal_to_dms(position.longitude)?))?;
        self.set(IfdKind::Gps, gps_tags::GPS_LONGITUDE_REF, TagValue::ascii(position.longitude_ref()))?;

        if self.get(IfdKind::Gps, gps_tags::GPS_VERSION_ID).is_none() {
            self.set(IfdKind::Gps, gps_tags::GPS_VERSION_ID, TagValue::Byte(GPS_VERSION.to_vec()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(values: [(u32, u32); 3]) -> Vec<Rational> {
        values.iter().map(|&pair| Rational::from(pair)).collect()
    }

    #[test]
    fn dms_to_decimal_known_value() {
        let dms = triple([(37, 1), (14, 1), (36, 10)]);
        let decimal = dms_to_decimal(&dms).unwrap();
        assert!((decimal - 37.234333).abs() < 1e-6);
    }

    #[test]
    fn decimal_to_dms_reproduces_known_triple() {
        let dms = decimal_to_dms(37.234333).unwrap();
        assert_eq!(dms[0], Rational::new(37, 1));
        assert_eq!(dms[1], Rational::new(14, 1));
        // 36/10 at the seconds scale
        assert_eq!(dms[2], Rational::new(360, 100));
    }

    #[test]
    fn round_trip_across_latitudes() {
        let mut d = -90.0;
        while d <= 90.0 {
            let back = dms_to_decimal(&decimal_to_dms(d).unwrap()).unwrap();
            assert!((back - d.abs()).abs() < 1e-4, "{} came back as {}", d, back);
            d += 0.137;
        }
    }

    #[test]
    fn seconds_carry_into_minutes() {
        // 10° 59' 59.999"
        let dms = decimal_to_dms(10.0 + 59.0 / 60.0 + 59.999 / 3600.0).unwrap();
        assert_eq!(dms, triple([(11, 1), (0, 1), (0, 100)]));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(decimal_to_dms(f64::NAN), Err(ExifError::InvalidRational(_))));
        assert!(dms_to_decimal(&triple([(1, 1), (2, 1), (3, 1)])[..2]).is_err());
        assert!(dms_to_decimal(&triple([(1, 0), (2, 1), (3, 1)])).is_err());
        assert!(GpsCoordinate::new(91.0, 0.0).is_err());
        assert!(GpsCoordinate::new(0.0, -180.5).is_err());
    }

    #[test]
    fn references_set_the_sign() {
        let lat = triple([(37, 1), (14, 1), (360, 100)]);
        let lon = triple([(115, 1), (48, 1), (2399, 100)]);
        let position = GpsCoordinate::from_dms(&lat, "N", &lon, "W").unwrap();

        assert!(position.latitude > 37.0);
        assert!(position.longitude < -115.0);
        assert_eq!(position.longitude_ref(), "W");
        assert!(GpsCoordinate::from_dms(&lat, "X", &lon, "W").is_err());
    }

    #[test]
    fn document_coordinates_round_trip() {
        let mut doc = ExifDocument::new();
        assert_eq!(doc.gps_coordinates().unwrap(), None);

        doc.set_gps_coordinates(-33.8568, 151.2153).unwrap();
        let position = doc.gps_coordinates().unwrap().unwrap();

        assert!((position.latitude + 33.8568).abs() < 1e-4);
        assert!((position.longitude - 151.2153).abs() < 1e-4);
        assert_eq!(doc.get(IfdKind::Gps, gps_tags::GPS_LATITUDE_REF), Some(&TagValue::ascii("S")));
        assert_eq!(doc.get(IfdKind::Gps, gps_tags::GPS_VERSION_ID), Some(&TagValue::Byte(vec![2, 2, 0, 0])));
    }

    #[test]
    fn map_url_uses_signed_degrees() {
        let position = GpsCoordinate::new(37.5, -115.25).unwrap();
        assert_eq!(position.map_url(), "https://www.google.com/maps?q=37.5,-115.25");
    }
}
