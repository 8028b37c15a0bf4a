//! Exif tag utilities
//!
//! Utilities for naming field types and rendering tag values.

use crate::exif::constants::field_types;
use crate::exif::registry;
use crate::exif::types::{IfdKind, TagValue};

/// Get the name of a TIFF field type
///
/// # Arguments
/// * `field_type` - The field type code
///
/// # Returns
/// The conventional upper-case name, or "Unknown"
pub fn get_field_type_name(field_type: u16) -> &'static str {
    match field_type {
        field_types::BYTE => "BYTE",
        field_types::ASCII => "ASCII",
        field_types::SHORT => "SHORT",
        field_types::LONG => "LONG",
        field_types::RATIONAL => "RATIONAL",
        field_types::SBYTE => "SBYTE",
        field_types::UNDEFINED => "UNDEFINED",
        field_types::SSHORT => "SSHORT",
        field_types::SLONG => "SLONG",
        field_types::SRATIONAL => "SRATIONAL",
        field_types::FLOAT => "FLOAT",
        field_types::DOUBLE => "DOUBLE",
        _ => "Unknown",
    }
}

/// Parses a field type name as used in the tag definitions file
///
/// Only the types the codec decodes are accepted.
pub fn parse_field_type_name(name: &str) -> Option<u16> {
    match name.to_ascii_lowercase().as_str() {
        "byte" => Some(field_types::BYTE),
        "ascii" => Some(field_types::ASCII),
        "short" => Some(field_types::SHORT),
        "long" => Some(field_types::LONG),
        "rational" => Some(field_types::RATIONAL),
        "undefined" => Some(field_types::UNDEFINED),
        "slong" => Some(field_types::SLONG),
        "srational" => Some(field_types::SRATIONAL),
        _ => None,
    }
}

/// Renders a value for display, adding the decimal form of single rationals
pub fn format_value(value: &TagValue) -> String {
    match value {
        TagValue::Rational(v) if v.len() == 1 => match v[0].to_f64() {
            Ok(decimal) => format!("{} ({})", v[0], decimal),
            Err(_) => v[0].to_string(),
        },
        TagValue::SRational(v) if v.len() == 1 => match v[0].to_f64() {
            Ok(decimal) => format!("{} ({})", v[0], decimal),
            Err(_) => v[0].to_string(),
        },
        _ => value.to_string(),
    }
}

/// Formats one entry as `Name (id, TYPE): value`
pub fn describe_entry(kind: IfdKind, tag: u16, value: &TagValue) -> String {
    format!(
        "{} ({}, {}): {}",
        registry::get_tag_name(kind, tag),
        tag,
        get_field_type_name(value.field_type()),
        format_value(value)
    )
}
