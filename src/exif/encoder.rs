//! Exif IFD encoder
//!
//! Serializes an `ExifDocument` into a TIFF block. Each IFD is written in
//! two passes: the entry table is laid out first with reserved slots for
//! out-of-line values and sub-IFD pointers, then the value area is appended
//! and the slots are patched with the final offsets.

use std::collections::HashMap;

use log::{debug, info, trace};

use crate::exif::constants::{exif_tags, field_types, header, image_tags};
use crate::exif::errors::{ExifError, ExifResult};
use crate::exif::registry;
use crate::exif::types::{ExifDocument, IfdKind, IfdSection, TagValue};
use crate::io::byte_order::ByteOrder;
use crate::io::writer::{ByteWriter, PatchSlot};
use crate::utils::write_utils;

/// Options controlling the encoded layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Byte order declared in the TIFF header
    pub byte_order: ByteOrder,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions { byte_order: ByteOrder::BigEndian }
    }
}

/// Block a pointer field refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PointerTarget {
    Ifd(IfdKind),
    Thumbnail,
}

/// One entry of an IFD awaiting serialization
#[derive(Debug)]
enum Entry<'a> {
    Value(&'a TagValue),
    Length(u32),
    Pointer(PointerTarget),
}

/// Pointer field resolved once every block has been placed
#[derive(Debug)]
struct PendingPatch {
    slot: PatchSlot,
    target: PointerTarget,
}

/// Writes IFDs into a single TIFF block
pub struct IfdEncoder {
    writer: ByteWriter,
    placed: HashMap<PointerTarget, u32>,
    pending: Vec<PendingPatch>,
}

impl IfdEncoder {
    /// Creates an encoder and writes the TIFF header
    pub fn new(byte_order: ByteOrder) -> Self {
        let mut writer = ByteWriter::new(byte_order);
        writer.write_bytes(&byte_order.marker());
        writer.write_u16(header::TIFF_VERSION);
        writer.write_u32(header::TIFF_HEADER_SIZE as u32);

        IfdEncoder {
            writer,
            placed: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Writes one IFD followed by its value area
    ///
    /// Entries are emitted in ascending tag order regardless of the order
    /// they were collected in.
    ///
    /// # Returns
    /// The slot holding the next-IFD offset, left as 0 until patched
    fn write_ifd(&mut self, kind: IfdKind, mut entries: Vec<(u16, Entry)>) -> ExifResult<PatchSlot> {
        entries.sort_by_key(|(tag, _)| *tag);

        let offset = self.writer.offset()?;
        self.placed.insert(PointerTarget::Ifd(kind), offset);
        debug!("Writing {} IFD with {} entries at offset {}", kind, entries.len(), offset);

        let entry_count = u16::try_from(entries.len())
            .map_err(|_| ExifError::InvalidValue(format!("{} IFD has too many entries ({})", kind, entries.len())))?;
        self.writer.write_u16(entry_count);

        let mut deferred: Vec<(PatchSlot, &TagValue)> = Vec::new();

        for (tag, entry) in &entries {
            self.writer.write_u16(*tag);

            match entry {
                Entry::Value(value) => {
                    let count = u32::try_from(value.count())
                        .map_err(|_| ExifError::InvalidValue(format!("{} tag {} has too many values", kind, tag)))?;
                    self.writer.write_u16(value.field_type());
                    self.writer.write_u32(count);

                    if value.is_inline() {
                        value.write_to(&mut self.writer);
                        let padding = write_utils::calculate_inline_padding(value.encoded_len());
                        self.writer.write_bytes(&[0u8; 4][..padding]);
                    } else {
                        deferred.push((self.writer.reserve_u32(), *value));
                    }
                    trace!("{} tag {} ({}) = {}", kind, tag, registry::get_tag_name(kind, *tag), value);
                },
                Entry::Length(length) => {
                    self.writer.write_u16(field_types::LONG);
                    self.writer.write_u32(1);
                    self.writer.write_u32(*length);
                },
                Entry::Pointer(target) => {
                    self.writer.write_u16(field_types::LONG);
                    self.writer.write_u32(1);
                    let slot = self.writer.reserve_u32();
                    self.pending.push(PendingPatch { slot, target: *target });
                },
            }
        }

        let next_ifd_slot = self.writer.reserve_u32();

        for (slot, value) in deferred {
            self.writer.align_to_word();
            let value_offset = self.writer.offset()?;
            self.writer.patch_u32(slot, value_offset)?;
            value.write_to(&mut self.writer);
        }
        self.writer.align_to_word();

        Ok(next_ifd_slot)
    }

    /// Appends the thumbnail bytes
    fn write_thumbnail(&mut self, thumbnail: &[u8]) -> ExifResult<()> {
        let offset = self.writer.offset()?;
        debug!("Writing {} byte thumbnail at offset {}", thumbnail.len(), offset);
        self.placed.insert(PointerTarget::Thumbnail, offset);
        self.writer.write_bytes(thumbnail);
        Ok(())
    }

    /// Resolves pointer fields and returns the TIFF block
    fn finish(mut self) -> ExifResult<Vec<u8>> {
        for patch in &self.pending {
            let offset = self.placed.get(&patch.target).copied().ok_or_else(|| {
                ExifError::GenericError(format!("Pointer target {:?} was never written", patch.target))
            })?;
            self.writer.patch_u32(patch.slot, offset)?;
        }
        Ok(self.writer.into_inner())
    }
}

/// Collects a section's entries, dropping structural tags
fn section_entries(kind: IfdKind, section: &IfdSection) -> Vec<(u16, Entry<'_>)> {
    section.iter()
        .filter(|(tag, _)| {
            let structural = registry::is_structural_tag(kind, **tag);
            if structural {
                debug!("Ignoring stored {} tag {}, it is derived from the layout", kind, tag);
            }
            !structural
        })
        .map(|(tag, value)| (*tag, Entry::Value(value)))
        .collect()
}

/// Encodes a document into a TIFF block
pub fn encode_tiff(doc: &ExifDocument, options: &EncodeOptions) -> ExifResult<Vec<u8>> {
    let has_interop = !doc.interop.is_empty();
    let has_exif = !doc.exif.is_empty() || has_interop;
    let has_gps = !doc.gps.is_empty();
    let has_first = !doc.first.is_empty() || doc.thumbnail.is_some();

    let mut encoder = IfdEncoder::new(options.byte_order);

    let mut zeroth = section_entries(IfdKind::Zeroth, &doc.zeroth);
    if has_exif {
        zeroth.push((image_tags::EXIF_IFD_POINTER, Entry::Pointer(PointerTarget::Ifd(IfdKind::Exif))));
    }
    if has_gps {
        zeroth.push((image_tags::GPS_IFD_POINTER, Entry::Pointer(PointerTarget::Ifd(IfdKind::Gps))));
    }
    let zeroth_next = encoder.write_ifd(IfdKind::Zeroth, zeroth)?;

    if has_exif {
        let mut exif = section_entries(IfdKind::Exif, &doc.exif);
        if has_interop {
            exif.push((exif_tags::INTEROP_IFD_POINTER, Entry::Pointer(PointerTarget::Ifd(IfdKind::Interop))));
        }
        encoder.write_ifd(IfdKind::Exif, exif)?;
    }

    if has_gps {
        encoder.write_ifd(IfdKind::Gps, section_entries(IfdKind::Gps, &doc.gps))?;
    }

    if has_interop {
        encoder.write_ifd(IfdKind::Interop, section_entries(IfdKind::Interop, &doc.interop))?;
    }

    if has_first {
        let mut first = section_entries(IfdKind::First, &doc.first);
        if let Some(thumbnail) = &doc.thumbnail {
            let length = u32::try_from(thumbnail.len())
                .map_err(|_| ExifError::InvalidValue(format!("Thumbnail of {} bytes is too large", thumbnail.len())))?;
            first.push((image_tags::JPEG_INTERCHANGE_FORMAT, Entry::Pointer(PointerTarget::Thumbnail)));
            first.push((image_tags::JPEG_INTERCHANGE_FORMAT_LENGTH, Entry::Length(length)));
        }
        encoder.write_ifd(IfdKind::First, first)?;
        encoder.pending.push(PendingPatch { slot: zeroth_next, target: PointerTarget::Ifd(IfdKind::First) });

        if let Some(thumbnail) = &doc.thumbnail {
            encoder.write_thumbnail(thumbnail)?;
        }
    }

    let tiff = encoder.finish()?;
    info!("Encoded {} tags into a {} byte TIFF block ({})", doc.tag_count(), tiff.len(), options.byte_order.name());
    Ok(tiff)
}

impl ExifDocument {
    /// Encodes the document as an APP1 payload (`Exif\0\0` + TIFF block)
    /// using big-endian byte order
    pub fn dump(&self) -> ExifResult<Vec<u8>> {
        self.dump_with(&EncodeOptions::default())
    }

    /// Encodes the document as an APP1 payload with explicit options
    pub fn dump_with(&self, options: &EncodeOptions) -> ExifResult<Vec<u8>> {
        let tiff = encode_tiff(self, options)?;

        let mut payload = Vec::with_capacity(header::EXIF_SIGNATURE.len() + tiff.len());
        payload.extend_from_slice(header::EXIF_SIGNATURE);
        payload.extend_from_slice(&tiff);
        Ok(payload)
    }
}
