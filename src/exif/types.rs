//! Core Exif data structures
//!
//! An `ExifDocument` holds the decoded tags of one JPEG, grouped into the
//! five IFD sections, plus the optional thumbnail bytes.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::exif::constants::{field_type_size, field_types};
use crate::exif::errors::ExifResult;
use crate::exif::rational::{Rational, SRational};
use crate::exif::registry;
use crate::io::byte_order::ByteOrder;
use crate::io::writer::ByteWriter;

/// Identifies one of the Image File Directories of an Exif block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IfdKind {
    /// Main image IFD ("0th")
    Zeroth,
    /// Camera settings sub-IFD ("Exif")
    Exif,
    /// GPS sub-IFD ("GPS")
    Gps,
    /// Interoperability sub-IFD ("Interop")
    Interop,
    /// Thumbnail IFD ("1st")
    First,
}

impl IfdKind {
    /// All sections in document order
    pub const ALL: [IfdKind; 5] = [
        IfdKind::Zeroth,
        IfdKind::Exif,
        IfdKind::Gps,
        IfdKind::Interop,
        IfdKind::First,
    ];

    /// Conventional section name
    pub fn name(&self) -> &'static str {
        match self {
            IfdKind::Zeroth => "0th",
            IfdKind::Exif => "Exif",
            IfdKind::Gps => "GPS",
            IfdKind::Interop => "Interop",
            IfdKind::First => "1st",
        }
    }
}

impl fmt::Display for IfdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded tag value
///
/// Each variant corresponds to one TIFF field type. Values of field types
/// the codec does not interpret are carried as `Opaque` bytes. When the
/// type's element size is known the bytes are held in big-endian order and
/// converted to the writer's order on encode; otherwise they are the raw
/// 4-byte value field and are written back untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Byte(Vec<u8>),
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    Undefined(Vec<u8>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Opaque { field_type: u16, count: u32, data: Vec<u8> },
}

impl TagValue {
    /// Convenience constructor for ASCII values
    pub fn ascii(value: &str) -> Self {
        TagValue::Ascii(value.to_string())
    }

    /// TIFF field type code written for this value
    pub fn field_type(&self) -> u16 {
        match self {
            TagValue::Byte(_) => field_types::BYTE,
            TagValue::Ascii(_) => field_types::ASCII,
            TagValue::Short(_) => field_types::SHORT,
            TagValue::Long(_) => field_types::LONG,
            TagValue::Rational(_) => field_types::RATIONAL,
            TagValue::Undefined(_) => field_types::UNDEFINED,
            TagValue::SLong(_) => field_types::SLONG,
            TagValue::SRational(_) => field_types::SRATIONAL,
            TagValue::Opaque { field_type, .. } => *field_type,
        }
    }

    /// Count field written for this value (ASCII includes the NUL terminator)
    pub fn count(&self) -> usize {
        match self {
            TagValue::Byte(v) | TagValue::Undefined(v) => v.len(),
            TagValue::Ascii(s) => s.len() + 1,
            TagValue::Short(v) => v.len(),
            TagValue::Long(v) => v.len(),
            TagValue::Rational(v) => v.len(),
            TagValue::SLong(v) => v.len(),
            TagValue::SRational(v) => v.len(),
            TagValue::Opaque { count, .. } => *count as usize,
        }
    }

    /// Size of the encoded value in bytes
    pub fn encoded_len(&self) -> usize {
        match self {
            TagValue::Opaque { data, .. } => data.len(),
            _ => field_type_size(self.field_type()).unwrap_or(1) * self.count(),
        }
    }

    /// Whether the encoded value fits in the entry's 4-byte value field
    pub fn is_inline(&self) -> bool {
        self.encoded_len() <= crate::exif::constants::ifd_layout::INLINE_VALUE_SIZE
    }

    /// Appends the encoded value using the writer's byte order
    pub fn write_to(&self, writer: &mut ByteWriter) {
        match self {
            TagValue::Byte(v) | TagValue::Undefined(v) => writer.write_bytes(v),
            TagValue::Ascii(s) => {
                writer.write_bytes(s.as_bytes());
                writer.write_u8(0);
            },
            TagValue::Short(v) => v.iter().for_each(|&x| writer.write_u16(x)),
            TagValue::Long(v) => v.iter().for_each(|&x| writer.write_u32(x)),
            TagValue::Rational(v) => v.iter().for_each(|&x| writer.write_rational(x)),
            TagValue::SLong(v) => v.iter().for_each(|&x| writer.write_i32(x)),
            TagValue::SRational(v) => v.iter().for_each(|&x| writer.write_srational(x)),
            TagValue::Opaque { field_type, data, .. } => match field_type_size(*field_type) {
                Some(size) => {
                    let converted = writer.byte_order().convert_elements(data, size, ByteOrder::BigEndian);
                    writer.write_bytes(&converted);
                },
                None => writer.write_bytes(data),
            },
        }
    }

    /// Returns the string of an ASCII value
    pub fn as_ascii(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the rationals of an unsigned rational value
    pub fn as_rationals(&self) -> Option<&[Rational]> {
        match self {
            TagValue::Rational(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the single rational of a one-element rational value
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            TagValue::Rational(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    /// Returns the first element of an unsigned integer value
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TagValue::Byte(v) => v.first().map(|&x| x as u32),
            TagValue::Short(v) => v.first().map(|&x| x as u32),
            TagValue::Long(v) => v.first().copied(),
            _ => None,
        }
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Ascii(s) => write!(f, "{}", s),
            TagValue::Byte(v) | TagValue::Undefined(v) => {
                if v.len() > 16 {
                    write!(f, "<{} bytes>", v.len())
                } else {
                    write!(f, "[{}]", join(v))
                }
            },
            TagValue::Short(v) => write!(f, "[{}]", join(v)),
            TagValue::Long(v) => write!(f, "[{}]", join(v)),
            TagValue::Rational(v) => write!(f, "[{}]", join(v)),
            TagValue::SLong(v) => write!(f, "[{}]", join(v)),
            TagValue::SRational(v) => write!(f, "[{}]", join(v)),
            TagValue::Opaque { field_type, data, .. } =>
                write!(f, "<type {}, {} bytes>", field_type, data.len()),
        }
    }
}

/// Tags of one IFD, keyed by tag id in ascending order
pub type IfdSection = BTreeMap<u16, TagValue>;

/// Decoded Exif metadata of one JPEG
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifDocument {
    /// Main image tags ("0th")
    pub zeroth: IfdSection,
    /// Camera sub-IFD tags ("Exif")
    pub exif: IfdSection,
    /// GPS tags ("GPS")
    pub gps: IfdSection,
    /// Interoperability tags ("Interop")
    pub interop: IfdSection,
    /// Thumbnail IFD tags ("1st")
    pub first: IfdSection,
    /// Opaque thumbnail bytes referenced by the 1st IFD
    pub thumbnail: Option<Vec<u8>>,
}

impl ExifDocument {
    /// Creates an empty document
    pub fn new() -> Self {
        ExifDocument::default()
    }

    /// Returns the tags of a section
    pub fn section(&self, kind: IfdKind) -> &IfdSection {
        match kind {
            IfdKind::Zeroth => &self.zeroth,
            IfdKind::Exif => &self.exif,
            IfdKind::Gps => &self.gps,
            IfdKind::Interop => &self.interop,
            IfdKind::First => &self.first,
        }
    }

    /// Returns the tags of a section for modification
    ///
    /// Values inserted this way are not checked against the tag registry.
    pub fn section_mut(&mut self, kind: IfdKind) -> &mut IfdSection {
        match kind {
            IfdKind::Zeroth => &mut self.zeroth,
            IfdKind::Exif => &mut self.exif,
            IfdKind::Gps => &mut self.gps,
            IfdKind::Interop => &mut self.interop,
            IfdKind::First => &mut self.first,
        }
    }

    /// Gets a tag value
    pub fn get(&self, kind: IfdKind, tag: u16) -> Option<&TagValue> {
        self.section(kind).get(&tag)
    }

    /// Sets a tag value after checking it against the tag registry
    ///
    /// Tags unknown to the registry are accepted as-is.
    pub fn set(&mut self, kind: IfdKind, tag: u16, value: TagValue) -> ExifResult<()> {
        registry::validate_value(kind, tag, &value)?;
        debug!("Setting {} tag {} ({}) to {}", kind, tag, registry::get_tag_name(kind, tag), value);
        self.section_mut(kind).insert(tag, value);
        Ok(())
    }

    /// Removes a tag, returning its previous value
    pub fn remove(&mut self, kind: IfdKind, tag: u16) -> Option<TagValue> {
        self.section_mut(kind).remove(&tag)
    }

    /// Iterates over all sections in document order
    pub fn sections(&self) -> impl Iterator<Item = (IfdKind, &IfdSection)> {
        IfdKind::ALL.into_iter().map(move |kind| (kind, self.section(kind)))
    }

    /// Whether the document carries no tags and no thumbnail
    pub fn is_empty(&self) -> bool {
        self.sections().all(|(_, section)| section.is_empty()) && self.thumbnail.is_none()
    }

    /// Total number of tags across all sections
    pub fn tag_count(&self) -> usize {
        self.sections().map(|(_, section)| section.len()).sum()
    }
}
