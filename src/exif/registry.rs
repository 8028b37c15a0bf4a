//! Exif tag registry
//!
//! This module maps (IFD, tag id) pairs to tag descriptors. Definitions
//! live in `exif_tags.toml`, are embedded at compile time and parsed once
//! on first use; the registry is read-only afterwards.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::error;

use crate::exif::constants::{exif_tags, field_types, image_tags};
use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::types::{IfdKind, TagValue};
use crate::utils::tag_utils;

lazy_static! {
    // Parse the embedded TOML definitions at first use
    static ref EXIF_DEFINITIONS: TagRegistry = {
        let content = include_str!("../../exif_tags.toml");
        TagRegistry::from_str(content).unwrap_or_else(|e| {
            error!("Failed to parse Exif tag definitions: {}", e);
            TagRegistry::default()
        })
    };
}

/// How many values a tag carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountRule {
    /// Exactly this many values (ASCII counts include the NUL terminator)
    Fixed(u32),
    /// Count given by the entry itself
    Variable,
}

/// Static description of one tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagDescriptor {
    pub name: String,
    pub field_type: u16,
    pub count: CountRule,
}

/// Container for the tag tables of each IFD
#[derive(Debug, Default)]
pub struct TagRegistry {
    // 0th and 1st IFD tags
    pub image: HashMap<u16, TagDescriptor>,
    pub exif: HashMap<u16, TagDescriptor>,
    pub gps: HashMap<u16, TagDescriptor>,
    pub interop: HashMap<u16, TagDescriptor>,
}

impl TagRegistry {
    /// Parse tag definitions from a TOML string
    pub fn from_str(content: &str) -> ExifResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(ExifError::GenericError(format!("Failed to parse TOML: {}", e))),
        };

        let mut registry = TagRegistry::default();
        Self::parse_tag_table(&toml_value, "image", &mut registry.image)?;
        Self::parse_tag_table(&toml_value, "exif", &mut registry.exif)?;
        Self::parse_tag_table(&toml_value, "gps", &mut registry.gps)?;
        Self::parse_tag_table(&toml_value, "interop", &mut registry.interop)?;

        Ok(registry)
    }

    fn parse_tag_table(
        toml_value: &toml::Value,
        table_name: &str,
        target: &mut HashMap<u16, TagDescriptor>,
    ) -> ExifResult<()> {
        let table = match toml_value.get(table_name).and_then(|v| v.as_table()) {
            Some(table) => table,
            None => return Ok(()),
        };

        for (key, entry) in table {
            let tag = key.parse::<u16>()
                .map_err(|_| ExifError::GenericError(format!("Invalid tag id '{}' in [{}]", key, table_name)))?;

            let name = entry.get("name").and_then(|v| v.as_str())
                .ok_or_else(|| ExifError::GenericError(format!("Tag {} in [{}] has no name", tag, table_name)))?;

            let type_name = entry.get("type").and_then(|v| v.as_str())
                .ok_or_else(|| ExifError::GenericError(format!("Tag {} in [{}] has no type", tag, table_name)))?;
            let field_type = tag_utils::parse_field_type_name(type_name)
                .ok_or_else(|| ExifError::GenericError(format!("Unknown type '{}' for tag {}", type_name, tag)))?;

            let count = match entry.get("count").and_then(|v| v.as_integer()) {
                Some(n) if n > 0 && n <= u32::MAX as i64 => CountRule::Fixed(n as u32),
                Some(n) => return Err(ExifError::GenericError(format!("Invalid count {} for tag {}", n, tag))),
                None => CountRule::Variable,
            };

            target.insert(tag, TagDescriptor { name: name.to_string(), field_type, count });
        }

        Ok(())
    }

    /// Returns the table describing an IFD
    fn table(&self, ifd: IfdKind) -> &HashMap<u16, TagDescriptor> {
        match ifd {
            IfdKind::Zeroth | IfdKind::First => &self.image,
            IfdKind::Exif => &self.exif,
            IfdKind::Gps => &self.gps,
            IfdKind::Interop => &self.interop,
        }
    }

    /// Looks up a tag descriptor
    pub fn lookup(&self, ifd: IfdKind, tag: u16) -> Option<&TagDescriptor> {
        self.table(ifd).get(&tag)
    }

    /// Get a tag name by IFD and id
    pub fn get_tag_name(&self, ifd: IfdKind, tag: u16) -> String {
        self.lookup(ifd, tag)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| format!("Unknown-{}", tag))
    }
}

/// Looks up a tag descriptor in the process-wide registry
pub fn tag_descriptor(ifd: IfdKind, tag: u16) -> Option<&'static TagDescriptor> {
    EXIF_DEFINITIONS.lookup(ifd, tag)
}

/// Get a tag name from the process-wide registry
pub fn get_tag_name(ifd: IfdKind, tag: u16) -> String {
    EXIF_DEFINITIONS.get_tag_name(ifd, tag)
}

/// Whether a tag describes the block layout rather than image metadata
///
/// These tags are written by the encoder from the document structure and
/// never stored in a section.
pub fn is_structural_tag(ifd: IfdKind, tag: u16) -> bool {
    match ifd {
        IfdKind::Zeroth => matches!(tag, image_tags::EXIF_IFD_POINTER | image_tags::GPS_IFD_POINTER),
        IfdKind::Exif => tag == exif_tags::INTEROP_IFD_POINTER,
        IfdKind::First => matches!(tag,
            image_tags::JPEG_INTERCHANGE_FORMAT | image_tags::JPEG_INTERCHANGE_FORMAT_LENGTH),
        _ => false,
    }
}

/// Whether a value's field type is acceptable for a registered field type
///
/// SHORT and LONG are interchangeable, as TIFF readers accept either for
/// integer tags.
pub fn is_compatible_type(registered: u16, actual: u16) -> bool {
    let integer = |t: u16| t == field_types::SHORT || t == field_types::LONG;
    registered == actual || (integer(registered) && integer(actual))
}

/// Checks a value against the registered type and count of its tag
pub fn validate_value(ifd: IfdKind, tag: u16, value: &TagValue) -> ExifResult<()> {
    if is_structural_tag(ifd, tag) {
        return Err(ExifError::InvalidValue(format!(
            "{} tag {} ({}) is written by the encoder and cannot be set",
            ifd, tag, get_tag_name(ifd, tag)
        )));
    }

    let descriptor = match tag_descriptor(ifd, tag) {
        Some(d) => d,
        None => return Ok(()),
    };

    if !is_compatible_type(descriptor.field_type, value.field_type()) {
        return Err(ExifError::InvalidValue(format!(
            "{} expects {} but got {}",
            descriptor.name,
            tag_utils::get_field_type_name(descriptor.field_type),
            tag_utils::get_field_type_name(value.field_type())
        )));
    }

    if let CountRule::Fixed(expected) = descriptor.count {
        if value.count() != expected as usize {
            return Err(ExifError::InvalidValue(format!(
                "{} expects {} values but got {}",
                descriptor.name, expected, value.count()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::constants::gps_tags;
    use crate::exif::rational::Rational;

    #[test]
    fn embedded_definitions_parse() {
        let registry = TagRegistry::from_str(include_str!("../../exif_tags.toml")).unwrap();
        assert!(registry.image.len() > 40);
        assert!(registry.exif.len() > 60);
        assert_eq!(registry.gps.len(), 32);
    }

    #[test]
    fn looks_up_per_ifd() {
        let lat = tag_descriptor(IfdKind::Gps, gps_tags::GPS_LATITUDE).unwrap();
        assert_eq!(lat.name, "GPSLatitude");
        assert_eq!(lat.field_type, field_types::RATIONAL);
        assert_eq!(lat.count, CountRule::Fixed(3));

        // Tag 2 means something else outside the GPS IFD
        assert_eq!(get_tag_name(IfdKind::Interop, 2), "InteroperabilityVersion");
        assert_eq!(get_tag_name(IfdKind::First, image_tags::MAKE), "Make");
        assert_eq!(get_tag_name(IfdKind::Exif, 1), "Unknown-1");
    }

    #[test]
    fn validates_type_and_count() {
        let three = TagValue::Rational(vec![Rational::new(1, 1); 3]);
        assert!(validate_value(IfdKind::Gps, gps_tags::GPS_LATITUDE, &three).is_ok());

        let two = TagValue::Rational(vec![Rational::new(1, 1); 2]);
        assert!(matches!(validate_value(IfdKind::Gps, gps_tags::GPS_LATITUDE, &two),
                         Err(ExifError::InvalidValue(_))));

        let wrong_type = TagValue::Long(vec![1, 2, 3]);
        assert!(validate_value(IfdKind::Gps, gps_tags::GPS_LATITUDE, &wrong_type).is_err());

        assert!(validate_value(IfdKind::Gps, gps_tags::GPS_LATITUDE_REF, &TagValue::ascii("N")).is_ok());
        assert!(validate_value(IfdKind::Gps, gps_tags::GPS_LATITUDE_REF, &TagValue::ascii("North")).is_err());
    }

    #[test]
    fn short_and_long_are_interchangeable() {
        let width = TagValue::Short(vec![640]);
        assert!(validate_value(IfdKind::Exif, exif_tags::PIXEL_X_DIMENSION, &width).is_ok());
    }

    #[test]
    fn structural_and_unknown_tags() {
        let pointer = TagValue::Long(vec![0]);
        assert!(validate_value(IfdKind::Zeroth, image_tags::EXIF_IFD_POINTER, &pointer).is_err());
        assert!(validate_value(IfdKind::Zeroth, 0xC000, &TagValue::Undefined(vec![1, 2])).is_ok());
    }
}
