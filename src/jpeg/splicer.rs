//! Exif segment splicing
//!
//! Produces new JPEG streams with the Exif APP1 segment inserted, replaced
//! or removed. Every other segment and the scan data are copied from their
//! raw source ranges, so they come out byte-for-byte unchanged.

use byteorder::{BigEndian, WriteBytesExt};
use log::{debug, info};

use crate::exif::constants::{header, markers};
use crate::exif::errors::{ExifError, ExifResult};
use crate::jpeg::segment::JpegFile;

/// Builds a complete APP1 segment around an Exif payload
fn build_app1(payload: &[u8]) -> ExifResult<Vec<u8>> {
    if !payload.starts_with(header::EXIF_SIGNATURE) {
        return Err(ExifError::InvalidHeader("Exif payload must start with the Exif signature".to_string()));
    }
    if payload.len() > markers::MAX_SEGMENT_PAYLOAD {
        return Err(ExifError::SegmentTooLarge(payload.len()));
    }

    let mut segment = Vec::with_capacity(payload.len() + 4);
    segment.push(markers::PREFIX);
    segment.push(markers::APP1);
    segment.write_u16::<BigEndian>((payload.len() + 2) as u16)?;
    segment.extend_from_slice(payload);
    Ok(segment)
}

/// Inserts or replaces the Exif segment of a JPEG
///
/// The first existing Exif APP1 segment is replaced in place and any later
/// ones are dropped. Without one, the new segment goes after the leading
/// APP0 segments, or directly after SOI.
///
/// # Arguments
/// * `exif` - APP1 payload starting with `Exif\0\0`, as produced by `ExifDocument::dump`
/// * `jpeg` - Source JPEG stream
pub fn insert(exif: &[u8], jpeg: &[u8]) -> ExifResult<Vec<u8>> {
    let app1 = build_app1(exif)?;
    let parsed = JpegFile::parse(jpeg)?;
    let segments = parsed.segments();

    let mut output = Vec::with_capacity(jpeg.len() + app1.len());
    output.extend_from_slice(&jpeg[..2]);

    if parsed.exif_segment().is_some() {
        let mut replaced = false;
        for segment in segments {
            if !segment.is_exif() {
                output.extend_from_slice(segment.raw(jpeg));
            } else if !replaced {
                debug!("Replacing Exif segment at {}", segment.range.start);
                output.extend_from_slice(&app1);
                replaced = true;
            } else {
                debug!("Dropping duplicate Exif segment at {}", segment.range.start);
            }
        }
    } else {
        let position = segments.iter().take_while(|s| s.marker == markers::APP0).count();
        debug!("Inserting Exif segment after {} APP0 segment(s)", position);

        for segment in &segments[..position] {
            output.extend_from_slice(segment.raw(jpeg));
        }
        output.extend_from_slice(&app1);
        for segment in &segments[position..] {
            output.extend_from_slice(segment.raw(jpeg));
        }
    }

    output.extend_from_slice(parsed.tail());
    info!("Wrote Exif segment of {} bytes into {} byte JPEG", app1.len(), output.len());
    Ok(output)
}

/// Removes every Exif segment from a JPEG
///
/// A stream without Exif data is returned as an unchanged copy.
pub fn remove(jpeg: &[u8]) -> ExifResult<Vec<u8>> {
    let parsed = JpegFile::parse(jpeg)?;

    let mut output = Vec::with_capacity(jpeg.len());
    output.extend_from_slice(&jpeg[..2]);

    let mut removed = 0;
    for segment in parsed.segments() {
        if segment.is_exif() {
            removed += 1;
        } else {
            output.extend_from_slice(segment.raw(jpeg));
        }
    }

    output.extend_from_slice(parsed.tail());
    info!("Removed {} Exif segment(s), {} bytes remain", removed, output.len());
    Ok(output)
}

/// Returns the payload of the first Exif segment, starting with `Exif\0\0`
pub fn extract(jpeg: &[u8]) -> ExifResult<Option<Vec<u8>>> {
    let parsed = JpegFile::parse(jpeg)?;
    Ok(parsed.exif_segment().map(|segment| segment.payload.to_vec()))
}
