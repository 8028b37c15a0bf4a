//! Rational number types used by Exif for physical quantities
//!
//! Exif stores non-integer values as numerator/denominator pairs. The pair
//! is kept exactly as read so that a decoded document re-encodes to the
//! same bytes; conversion to a real number happens on demand.

use std::fmt;

use crate::exif::errors::{ExifError, ExifResult};

/// Unsigned rational (TIFF type 5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: u32,
    pub denom: u32,
}

/// Signed rational (TIFF type 10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SRational {
    pub num: i32,
    pub denom: i32,
}

impl Rational {
    pub fn new(num: u32, denom: u32) -> Self {
        Rational { num, denom }
    }

    /// Converts to a real number, failing on a zero denominator
    pub fn to_f64(&self) -> ExifResult<f64> {
        if self.denom == 0 {
            return Err(ExifError::InvalidRational(format!("{}/0 has a zero denominator", self.num)));
        }
        Ok(self.num as f64 / self.denom as f64)
    }

    /// Builds a rational approximating `value` with the given denominator
    ///
    /// The numerator is rounded to the nearest integer. Negative or
    /// non-finite input, or a numerator overflowing u32, is rejected.
    pub fn from_f64(value: f64, denom: u32) -> ExifResult<Self> {
        if !value.is_finite() {
            return Err(ExifError::InvalidRational(format!("{} is not finite", value)));
        }
        if denom == 0 {
            return Err(ExifError::InvalidRational("requested denominator is zero".to_string()));
        }

        let scaled = (value * denom as f64).round();
        if scaled < 0.0 || scaled > u32::MAX as f64 {
            return Err(ExifError::InvalidRational(format!(
                "{} cannot be represented as an unsigned rational over {}", value, denom
            )));
        }

        Ok(Rational::new(scaled as u32, denom))
    }
}

impl SRational {
    pub fn new(num: i32, denom: i32) -> Self {
        SRational { num, denom }
    }

    /// Converts to a real number, failing on a zero denominator
    pub fn to_f64(&self) -> ExifResult<f64> {
        if self.denom == 0 {
            return Err(ExifError::InvalidRational(format!("{}/0 has a zero denominator", self.num)));
        }
        Ok(self.num as f64 / self.denom as f64)
    }

    /// Builds a signed rational approximating `value` with the given denominator
    pub fn from_f64(value: f64, denom: i32) -> ExifResult<Self> {
        if !value.is_finite() {
            return Err(ExifError::InvalidRational(format!("{} is not finite", value)));
        }
        if denom == 0 {
            return Err(ExifError::InvalidRational("requested denominator is zero".to_string()));
        }

        let scaled = (value * denom as f64).round();
        if scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
            return Err(ExifError::InvalidRational(format!(
                "{} cannot be represented as a signed rational over {}", value, denom
            )));
        }

        Ok(SRational::new(scaled as i32, denom))
    }
}

impl From<(u32, u32)> for Rational {
    fn from((num, denom): (u32, u32)) -> Self {
        Rational::new(num, denom)
    }
}

impl From<(i32, i32)> for SRational {
    fn from((num, denom): (i32, i32)) -> Self {
        SRational::new(num, denom)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

/// Converts a numerator/denominator pair to a real number
pub fn rational_to_decimal(value: Rational) -> ExifResult<f64> {
    value.to_f64()
}
