//! Exif IFD decoder
//!
//! This module reads the TIFF block carried by an Exif APP1 segment: it
//! validates the TIFF header, decodes each IFD's entries into `TagValue`s
//! and follows the sub-IFD pointers and the thumbnail reference to build
//! an `ExifDocument`.

use log::{debug, info, trace, warn};

use crate::exif::constants::{exif_tags, field_type_size, field_types, header, ifd_layout, image_tags};
use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::registry;
use crate::exif::types::{ExifDocument, IfdKind, IfdSection, TagValue};
use crate::io::byte_order::ByteOrder;
use crate::io::cursor::ByteCursor;
use crate::jpeg::splicer;
use crate::utils::{string_utils, tag_utils};

/// Result of decoding a single IFD
#[derive(Debug)]
pub struct DecodedIfd {
    /// Decoded entries keyed by tag id, including pointer tags
    pub entries: IfdSection,
    /// Offset of the next IFD in the chain, 0 if none
    pub next_ifd_offset: u32,
    /// Non-fatal problems with individual entries
    pub issues: Vec<ExifError>,
}

/// Raw 12-byte entry record
#[derive(Debug, Clone, Copy)]
struct EntryHeader {
    /// Offset of the entry record within the block
    offset: usize,
    tag: u16,
    field_type: u16,
    count: u32,
    value_field: [u8; 4],
}

/// Decoder for the IFDs of one TIFF block
pub struct IfdDecoder<'a> {
    cursor: ByteCursor<'a>,
    first_ifd_offset: u32,
}

impl<'a> IfdDecoder<'a> {
    /// Creates a decoder after validating the TIFF header
    ///
    /// # Arguments
    /// * `tiff` - The TIFF block, starting with the byte order marker
    pub fn new(tiff: &'a [u8]) -> ExifResult<Self> {
        if tiff.len() < header::TIFF_HEADER_SIZE {
            return Err(ExifError::InvalidHeader(format!(
                "TIFF block of {} bytes is shorter than its header", tiff.len()
            )));
        }

        let byte_order = ByteOrder::detect(tiff)?;
        debug!("Detected byte order: {}", byte_order.name());

        let mut cursor = ByteCursor::new(tiff, byte_order);
        cursor.seek(2)?;

        let version = cursor.read_u16()?;
        if version != header::TIFF_VERSION {
            return Err(ExifError::InvalidHeader(format!("unexpected TIFF version {}", version)));
        }

        let first_ifd_offset = cursor.read_u32()?;
        debug!("First IFD offset: {}", first_ifd_offset);

        Ok(IfdDecoder { cursor, first_ifd_offset })
    }

    /// Byte order declared by the TIFF header
    pub fn byte_order(&self) -> ByteOrder {
        self.cursor.byte_order()
    }

    /// Offset of the 0th IFD
    pub fn first_ifd_offset(&self) -> u32 {
        self.first_ifd_offset
    }

    /// Reads an IFD at the given offset
    ///
    /// A header or entry table outside the buffer fails with `MalformedIfd`.
    /// Problems confined to one entry are recorded in `issues`: entries whose
    /// value range exceeds the buffer are skipped, entries of unsupported
    /// field types are kept as `TagValue::Opaque`.
    ///
    /// # Arguments
    /// * `kind` - Which IFD is being read, used for diagnostics
    /// * `offset` - Absolute offset of the IFD in the TIFF block
    pub fn read_ifd(&mut self, kind: IfdKind, offset: u32) -> ExifResult<DecodedIfd> {
        let offset = offset as usize;
        let malformed = |reason: String| ExifError::MalformedIfd {
            ifd: kind.name().to_string(),
            offset,
            reason,
        };

        self.cursor.seek(offset)
            .map_err(|_| malformed(format!("offset exceeds block of {} bytes", self.cursor.len())))?;

        let entry_count = self.cursor.read_u16()
            .map_err(|_| malformed("entry count lies outside the block".to_string()))? as usize;
        debug!("{} IFD entry count: {}", kind, entry_count);

        let table_end = offset + ifd_layout::ENTRY_COUNT_SIZE + entry_count * ifd_layout::ENTRY_SIZE;
        if table_end > self.cursor.len() {
            return Err(malformed(format!(
                "{} entries end at {} past block of {} bytes", entry_count, table_end, self.cursor.len()
            )));
        }

        let mut headers = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            headers.push(self.read_entry_header()?);
        }

        let next_ifd_offset = match self.cursor.read_u32() {
            Ok(next) => next,
            Err(_) => {
                warn!("{} IFD has no next-IFD offset, treating as last", kind);
                0
            }
        };

        let mut entries = IfdSection::new();
        let mut issues = Vec::new();

        for h in &headers {
            match self.decode_value(kind, h, &mut issues) {
                Ok(value) => {
                    trace!("{} tag {} ({}): {}", kind, h.tag, registry::get_tag_name(kind, h.tag), value);
                    entries.insert(h.tag, value);
                },
                Err(e) => {
                    warn!("Skipping {} tag {}: {}", kind, h.tag, e);
                    issues.push(e);
                }
            }
        }

        info!("Read {} IFD with {} entries", kind, entries.len());
        Ok(DecodedIfd { entries, next_ifd_offset, issues })
    }

    /// Reads a single 12-byte entry record at the cursor
    fn read_entry_header(&mut self) -> ExifResult<EntryHeader> {
        let offset = self.cursor.position();
        let tag = self.cursor.read_u16()?;
        let field_type = self.cursor.read_u16()?;
        let count = self.cursor.read_u32()?;

        let mut value_field = [0u8; 4];
        value_field.copy_from_slice(self.cursor.read_bytes(ifd_layout::INLINE_VALUE_SIZE)?);

        Ok(EntryHeader { offset, tag, field_type, count, value_field })
    }

    /// Resolves an entry's bytes, inline or at its offset, and decodes them
    fn decode_value(&self, kind: IfdKind, h: &EntryHeader, issues: &mut Vec<ExifError>) -> ExifResult<TagValue> {
        let malformed = |reason: String| ExifError::MalformedIfd {
            ifd: kind.name().to_string(),
            offset: h.offset,
            reason,
        };

        let item_size = match field_type_size(h.field_type) {
            Some(size) => size,
            None => {
                // Length unknowable, keep the value field itself
                issues.push(self.unsupported(kind, h));
                return Ok(TagValue::Opaque {
                    field_type: h.field_type,
                    count: h.count,
                    data: h.value_field.to_vec(),
                });
            }
        };

        let total = item_size.checked_mul(h.count as usize)
            .ok_or_else(|| malformed(format!("tag {} count {} overflows", h.tag, h.count)))?;

        let data: &[u8] = if total <= ifd_layout::INLINE_VALUE_SIZE {
            &h.value_field[..total]
        } else {
            let value_offset = self.cursor_u32(&h.value_field) as usize;
            self.cursor.bytes_at(value_offset, total)
                .map_err(|_| malformed(format!(
                    "tag {} value of {} bytes at offset {} exceeds block of {} bytes",
                    h.tag, total, value_offset, self.cursor.len()
                )))?
        };

        let mut values = ByteCursor::new(data, self.cursor.byte_order());
        let count = h.count as usize;

        let value = match h.field_type {
            field_types::BYTE => TagValue::Byte(data.to_vec()),
            field_types::ASCII => TagValue::Ascii(string_utils::ascii_from_bytes(data)),
            field_types::SHORT => TagValue::Short(
                (0..count).map(|_| values.read_u16()).collect::<ExifResult<Vec<_>>>()?),
            field_types::LONG => TagValue::Long(
                (0..count).map(|_| values.read_u32()).collect::<ExifResult<Vec<_>>>()?),
            field_types::RATIONAL => TagValue::Rational(
                (0..count).map(|_| values.read_rational()).collect::<ExifResult<Vec<_>>>()?),
            field_types::UNDEFINED => TagValue::Undefined(data.to_vec()),
            field_types::SLONG => TagValue::SLong(
                (0..count).map(|_| values.read_i32()).collect::<ExifResult<Vec<_>>>()?),
            field_types::SRATIONAL => TagValue::SRational(
                (0..count).map(|_| values.read_srational()).collect::<ExifResult<Vec<_>>>()?),
            _ => {
                issues.push(self.unsupported(kind, h));
                let data = ByteOrder::BigEndian.convert_elements(data, item_size, self.cursor.byte_order());
                TagValue::Opaque { field_type: h.field_type, count: h.count, data }
            }
        };

        Ok(value)
    }

    fn unsupported(&self, kind: IfdKind, h: &EntryHeader) -> ExifError {
        warn!("{} tag {} has unsupported field type {} ({}), keeping raw bytes",
              kind, h.tag, h.field_type, tag_utils::get_field_type_name(h.field_type));
        ExifError::UnsupportedType { ifd: kind.name().to_string(), tag: h.tag, type_code: h.field_type }
    }

    fn cursor_u32(&self, bytes: &[u8; 4]) -> u32 {
        self.cursor.byte_order().create_handler().read_u32(bytes)
    }

    /// Returns `len` bytes at an absolute offset of the TIFF block
    pub fn bytes_at(&self, offset: usize, len: usize) -> ExifResult<&'a [u8]> {
        self.cursor.bytes_at(offset, len)
    }
}

/// Removes a pointer tag from a section and returns its offset
fn take_pointer(kind: IfdKind, section: &mut IfdSection, tag: u16, issues: &mut Vec<ExifError>) -> Option<u32> {
    let value = section.remove(&tag)?;
    match value.as_u32() {
        Some(0) => None,
        Some(offset) => Some(offset),
        None => {
            warn!("{} pointer tag {} holds {}, ignoring", kind, tag, value);
            issues.push(ExifError::MalformedIfd {
                ifd: kind.name().to_string(),
                offset: 0,
                reason: format!("pointer tag {} is not an integer", tag),
            });
            None
        }
    }
}

/// Reads a sub-IFD, recording a failure as an issue rather than aborting
fn read_sub_ifd(decoder: &mut IfdDecoder, kind: IfdKind, offset: u32, issues: &mut Vec<ExifError>) -> Option<DecodedIfd> {
    match decoder.read_ifd(kind, offset) {
        Ok(mut decoded) => {
            issues.append(&mut decoded.issues);
            Some(decoded)
        },
        Err(e) => {
            warn!("Error reading {} IFD: {}", kind, e);
            issues.push(e);
            None
        }
    }
}

/// Extracts the thumbnail referenced by the 1st IFD
///
/// On success the offset/length tags are removed from the section; a
/// reference outside the block leaves them in place.
fn take_thumbnail(decoder: &IfdDecoder, first: &mut IfdSection, issues: &mut Vec<ExifError>) -> Option<Vec<u8>> {
    let offset = first.get(&image_tags::JPEG_INTERCHANGE_FORMAT)?.as_u32()?;
    let length = first.get(&image_tags::JPEG_INTERCHANGE_FORMAT_LENGTH)?.as_u32()?;

    match decoder.bytes_at(offset as usize, length as usize) {
        Ok(bytes) => {
            debug!("Thumbnail of {} bytes at offset {}", length, offset);
            first.remove(&image_tags::JPEG_INTERCHANGE_FORMAT);
            first.remove(&image_tags::JPEG_INTERCHANGE_FORMAT_LENGTH);
            Some(bytes.to_vec())
        },
        Err(e) => {
            warn!("Thumbnail reference is invalid: {}", e);
            issues.push(e);
            None
        }
    }
}

/// Decodes a TIFF block into a document
///
/// # Returns
/// The document plus non-fatal issues found while decoding
pub fn decode_tiff(tiff: &[u8]) -> ExifResult<(ExifDocument, Vec<ExifError>)> {
    let mut decoder = IfdDecoder::new(tiff)?;
    let mut issues = Vec::new();
    let mut doc = ExifDocument::new();

    let first_ifd_offset = decoder.first_ifd_offset();
    let mut zeroth = decoder.read_ifd(IfdKind::Zeroth, first_ifd_offset)?;
    issues.append(&mut zeroth.issues);

    let exif_offset = take_pointer(IfdKind::Zeroth, &mut zeroth.entries, image_tags::EXIF_IFD_POINTER, &mut issues);
    let gps_offset = take_pointer(IfdKind::Zeroth, &mut zeroth.entries, image_tags::GPS_IFD_POINTER, &mut issues);
    doc.zeroth = zeroth.entries;

    let mut interop_offset = None;
    if let Some(offset) = exif_offset {
        if let Some(mut exif) = read_sub_ifd(&mut decoder, IfdKind::Exif, offset, &mut issues) {
            interop_offset = take_pointer(IfdKind::Exif, &mut exif.entries, exif_tags::INTEROP_IFD_POINTER, &mut issues);
            doc.exif = exif.entries;
        }
    }

    if let Some(offset) = gps_offset {
        if let Some(gps) = read_sub_ifd(&mut decoder, IfdKind::Gps, offset, &mut issues) {
            doc.gps = gps.entries;
        }
    }

    if let Some(offset) = interop_offset {
        if let Some(interop) = read_sub_ifd(&mut decoder, IfdKind::Interop, offset, &mut issues) {
            doc.interop = interop.entries;
        }
    }

    if zeroth.next_ifd_offset != 0 {
        if let Some(first) = read_sub_ifd(&mut decoder, IfdKind::First, zeroth.next_ifd_offset, &mut issues) {
            doc.first = first.entries;
            doc.thumbnail = take_thumbnail(&decoder, &mut doc.first, &mut issues);
        }
    }

    info!("Decoded Exif block: {} tags, thumbnail: {}, {} issues",
          doc.tag_count(), doc.thumbnail.is_some(), issues.len());
    Ok((doc, issues))
}

impl ExifDocument {
    /// Decodes the Exif metadata of a JPEG
    ///
    /// Accepts a complete JPEG, an APP1 payload starting with `Exif\0\0`,
    /// or a bare TIFF block. A JPEG without an Exif segment yields an
    /// empty document.
    ///
    /// Only fatal errors are returned. Skipped entries, unsupported types
    /// and unreadable sub-IFDs are dropped silently; use `load_with_issues`
    /// to see them.
    pub fn load(data: &[u8]) -> ExifResult<Self> {
        Self::load_with_issues(data).map(|(doc, _)| doc)
    }

    /// Like `load`, also returning the non-fatal issues met while decoding
    pub fn load_with_issues(data: &[u8]) -> ExifResult<(Self, Vec<ExifError>)> {
        if data.starts_with(&[0xFF, crate::exif::constants::markers::SOI]) {
            return match splicer::extract(data)? {
                Some(payload) => decode_tiff(&payload[header::EXIF_SIGNATURE.len()..]),
                None => {
                    debug!("JPEG carries no Exif segment");
                    Ok((ExifDocument::new(), Vec::new()))
                }
            };
        }

        if data.starts_with(header::EXIF_SIGNATURE) {
            return decode_tiff(&data[header::EXIF_SIGNATURE.len()..]);
        }

        if data.starts_with(&header::LITTLE_ENDIAN_MARKER) || data.starts_with(&header::BIG_ENDIAN_MARKER) {
            return decode_tiff(data);
        }

        Err(ExifError::NotAJpeg)
    }
}
