//! JPEG marker segment parsing
//!
//! A JPEG stream is a sequence of marker segments following the SOI
//! marker. Scanning stops at SOS (or EOI): what follows is entropy-coded
//! data that may contain byte sequences resembling markers, so it is kept
//! as an opaque tail.

use std::ops::Range;

use byteorder::{BigEndian, ByteOrder as _};
use log::{debug, trace};

use crate::exif::constants::{header, markers};
use crate::exif::errors::{ExifError, ExifResult};

/// One marker segment of a JPEG header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSegment<'a> {
    /// Marker code (the byte following 0xFF)
    pub marker: u8,
    /// Declared length, including the two length bytes; `None` for standalone markers
    pub length: Option<u16>,
    /// Payload after the length field
    pub payload: &'a [u8],
    /// Raw byte range in the source, including any fill bytes before the marker
    pub range: Range<usize>,
}

impl<'a> MarkerSegment<'a> {
    /// Whether this is an APP1 segment carrying Exif data
    pub fn is_exif(&self) -> bool {
        self.marker == markers::APP1 && self.payload.starts_with(header::EXIF_SIGNATURE)
    }

    /// Raw bytes of the segment as found in the source
    pub fn raw<'b>(&self, source: &'b [u8]) -> &'b [u8] {
        &source[self.range.clone()]
    }
}

/// Whether a marker stands alone, without a length field
fn is_standalone(marker: u8) -> bool {
    marker == markers::TEM || (markers::RST0..=markers::RST7).contains(&marker)
}

/// Read-only view of a JPEG's marker segments
#[derive(Debug)]
pub struct JpegFile<'a> {
    data: &'a [u8],
    segments: Vec<MarkerSegment<'a>>,
    tail_start: usize,
}

impl<'a> JpegFile<'a> {
    /// Parses the marker segments of a JPEG byte stream
    ///
    /// # Errors
    /// `NotAJpeg` if the stream does not begin with SOI, and
    /// `MalformedSegment` if a segment header or length is inconsistent
    /// with the buffer.
    pub fn parse(data: &'a [u8]) -> ExifResult<Self> {
        if data.len() < 2 || data[0] != markers::PREFIX || data[1] != markers::SOI {
            return Err(ExifError::NotAJpeg);
        }

        let mut segments = Vec::new();
        let mut pos = 2;

        let tail_start = loop {
            if pos >= data.len() {
                break data.len();
            }

            let start = pos;
            if data[pos] != markers::PREFIX {
                return Err(ExifError::MalformedSegment {
                    offset: pos,
                    reason: format!("expected marker prefix, found 0x{:02X}", data[pos]),
                });
            }

            // Any number of 0xFF fill bytes may precede a marker
            while pos < data.len() && data[pos] == markers::PREFIX {
                pos += 1;
            }
            if pos >= data.len() {
                return Err(ExifError::MalformedSegment { offset: start, reason: "truncated marker".to_string() });
            }

            let marker = data[pos];
            pos += 1;

            if marker == markers::SOS || marker == markers::EOI {
                trace!("Marker 0x{:02X} at {} ends the header", marker, start);
                break start;
            }

            if is_standalone(marker) {
                segments.push(MarkerSegment { marker, length: None, payload: &data[pos..pos], range: start..pos });
                continue;
            }

            if marker == 0x00 {
                return Err(ExifError::MalformedSegment { offset: start, reason: "stuffed byte outside scan data".to_string() });
            }

            if pos + 2 > data.len() {
                return Err(ExifError::MalformedSegment {
                    offset: start,
                    reason: format!("length of marker 0x{:02X} is truncated", marker),
                });
            }

            let length = BigEndian::read_u16(&data[pos..pos + 2]);
            if length < 2 {
                return Err(ExifError::MalformedSegment {
                    offset: start,
                    reason: format!("marker 0x{:02X} declares length {}", marker, length),
                });
            }

            let end = pos + length as usize;
            if end > data.len() {
                return Err(ExifError::MalformedSegment {
                    offset: start,
                    reason: format!("marker 0x{:02X} length {} exceeds stream of {} bytes", marker, length, data.len()),
                });
            }

            trace!("Segment 0x{:02X} at {} with length {}", marker, start, length);
            segments.push(MarkerSegment { marker, length: Some(length), payload: &data[pos + 2..end], range: start..end });
            pos = end;
        };

        debug!("Parsed {} JPEG segments, scan data at {}", segments.len(), tail_start);
        Ok(JpegFile { data, segments, tail_start })
    }

    /// Segments between SOI and the start of scan, in stream order
    pub fn segments(&self) -> &[MarkerSegment<'a>] {
        &self.segments
    }

    /// Everything from the SOS (or EOI) marker to the end of the stream
    pub fn tail(&self) -> &'a [u8] {
        &self.data[self.tail_start..]
    }

    /// The first Exif APP1 segment, if any
    pub fn exif_segment(&self) -> Option<&MarkerSegment<'a>> {
        self.segments.iter().find(|segment| segment.is_exif())
    }
}

/// Locates the Exif APP1 segment of a JPEG
///
/// # Returns
/// The raw byte range of the segment, or `None` if the stream has none
pub fn locate_exif(data: &[u8]) -> ExifResult<Option<Range<usize>>> {
    let jpeg = JpegFile::parse(data)?;
    Ok(jpeg.exif_segment().map(|segment| segment.range.clone()))
}
