//! Tests for the IFD decoder

extern crate std;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::exif::constants::{exif_tags, image_tags};
use crate::exif::decoder::{decode_tiff, IfdDecoder};
use crate::exif::errors::ExifError;
use crate::exif::rational::Rational;
use crate::exif::types::{ExifDocument, IfdKind, TagValue};
use super::test_utils::{minimal_jpeg, value_u16, value_u32, write_entry, write_header};

/// Little-endian block: 0th IFD with Make, Orientation and an Exif pointer,
/// Exif IFD with ExposureTime
fn little_endian_block() -> Vec<u8> {
    type B = LittleEndian;
    let mut buffer = Vec::new();
    write_header::<B>(&mut buffer, 8);

    // 0th IFD at 8, values from 50
    buffer.write_u16::<B>(3).unwrap();
    write_entry::<B>(&mut buffer, image_tags::MAKE, 2, 6, value_u32::<B>(50));
    write_entry::<B>(&mut buffer, image_tags::ORIENTATION, 3, 1, value_u16::<B>(6));
    write_entry::<B>(&mut buffer, image_tags::EXIF_IFD_POINTER, 4, 1, value_u32::<B>(56));
    buffer.write_u32::<B>(0).unwrap();
    std::assert_eq!(buffer.len(), 50);
    buffer.extend_from_slice(b"Canon\0");

    // Exif IFD at 56, value at 74
    buffer.write_u16::<B>(1).unwrap();
    write_entry::<B>(&mut buffer, exif_tags::EXPOSURE_TIME, 5, 1, value_u32::<B>(74));
    buffer.write_u32::<B>(0).unwrap();
    std::assert_eq!(buffer.len(), 74);
    buffer.write_u32::<B>(1).unwrap();
    buffer.write_u32::<B>(250).unwrap();

    buffer
}

#[test]
fn test_decode_little_endian_block() {
    let (doc, issues) = decode_tiff(&little_endian_block()).unwrap();

    std::assert!(issues.is_empty());
    std::assert_eq!(doc.get(IfdKind::Zeroth, image_tags::MAKE), Some(&TagValue::ascii("Canon")));
    std::assert_eq!(doc.get(IfdKind::Zeroth, image_tags::ORIENTATION), Some(&TagValue::Short(vec![6])));
    std::assert_eq!(doc.get(IfdKind::Exif, exif_tags::EXPOSURE_TIME),
                    Some(&TagValue::Rational(vec![Rational::new(1, 250)])));

    // Pointer tags are layout, not content
    std::assert_eq!(doc.get(IfdKind::Zeroth, image_tags::EXIF_IFD_POINTER), None);
    std::assert!(doc.gps.is_empty());
    std::assert_eq!(doc.thumbnail, None);
}

#[test]
fn test_read_ifd_reports_next_offset() {
    type B = BigEndian;
    let mut buffer = Vec::new();
    write_header::<B>(&mut buffer, 8);
    buffer.write_u16::<B>(1).unwrap();
    write_entry::<B>(&mut buffer, 0xC000, 7, 3, [1, 2, 3, 0]);
    buffer.write_u32::<B>(0x1234).unwrap();

    let mut decoder = IfdDecoder::new(&buffer).unwrap();
    let offset = decoder.first_ifd_offset();
    let ifd = decoder.read_ifd(IfdKind::Zeroth, offset).unwrap();

    std::assert_eq!(ifd.next_ifd_offset, 0x1234);
    // Unknown tags are kept
    std::assert_eq!(ifd.entries.get(&0xC000), Some(&TagValue::Undefined(vec![1, 2, 3])));
}

#[test]
fn test_unsupported_type_is_kept_opaque() {
    type B = BigEndian;
    let mut buffer = Vec::new();
    write_header::<B>(&mut buffer, 8);
    buffer.write_u16::<B>(2).unwrap();
    write_entry::<B>(&mut buffer, image_tags::MAKE, 2, 2, [b'X', 0, 0, 0]);
    write_entry::<B>(&mut buffer, 0xC001, 11, 1, [0x3F, 0x80, 0x00, 0x00]);
    buffer.write_u32::<B>(0).unwrap();

    let (doc, issues) = decode_tiff(&buffer).unwrap();

    std::assert_eq!(doc.get(IfdKind::Zeroth, image_tags::MAKE), Some(&TagValue::ascii("X")));
    std::assert_eq!(doc.get(IfdKind::Zeroth, 0xC001), Some(&TagValue::Opaque {
        field_type: 11,
        count: 1,
        data: vec![0x3F, 0x80, 0x00, 0x00],
    }));
    std::assert_eq!(issues.len(), 1);
    std::assert!(matches!(issues[0], ExifError::UnsupportedType { tag: 0xC001, type_code: 11, .. }));
}

#[test]
fn test_out_of_range_value_skips_entry() {
    type B = LittleEndian;
    let mut buffer = Vec::new();
    write_header::<B>(&mut buffer, 8);
    buffer.write_u16::<B>(2).unwrap();
    write_entry::<B>(&mut buffer, image_tags::MODEL, 2, 40, value_u32::<B>(1000));
    write_entry::<B>(&mut buffer, image_tags::ORIENTATION, 3, 1, value_u16::<B>(1));
    buffer.write_u32::<B>(0).unwrap();

    let (doc, issues) = decode_tiff(&buffer).unwrap();

    std::assert_eq!(doc.get(IfdKind::Zeroth, image_tags::MODEL), None);
    std::assert_eq!(doc.get(IfdKind::Zeroth, image_tags::ORIENTATION), Some(&TagValue::Short(vec![1])));
    // Reported at the failing entry, not the end of the table
    std::assert!(matches!(issues.as_slice(), [ExifError::MalformedIfd { offset: 10, .. }]));
}

#[test]
fn test_unknown_type_code_keeps_value_field() {
    type B = LittleEndian;
    let mut buffer = Vec::new();
    write_header::<B>(&mut buffer, 8);
    buffer.write_u16::<B>(1).unwrap();
    write_entry::<B>(&mut buffer, 0xC300, 13, 7, [0xDE, 0xAD, 0xBE, 0xEF]);
    buffer.write_u32::<B>(0).unwrap();

    let (doc, issues) = decode_tiff(&buffer).unwrap();

    std::assert_eq!(doc.get(IfdKind::Zeroth, 0xC300), Some(&TagValue::Opaque {
        field_type: 13,
        count: 7,
        data: vec![0xDE, 0xAD, 0xBE, 0xEF],
    }));
    std::assert!(matches!(issues.as_slice(), [ExifError::UnsupportedType { tag: 0xC300, type_code: 13, .. }]));
}

#[test]
fn test_little_endian_opaque_held_big_endian() {
    type B = LittleEndian;
    let mut buffer = Vec::new();
    write_header::<B>(&mut buffer, 8);
    buffer.write_u16::<B>(1).unwrap();
    // SSHORT [-2, 300]
    write_entry::<B>(&mut buffer, 0xC200, 8, 2, [0xFE, 0xFF, 0x2C, 0x01]);
    buffer.write_u32::<B>(0).unwrap();

    let (doc, _) = decode_tiff(&buffer).unwrap();

    std::assert_eq!(doc.get(IfdKind::Zeroth, 0xC200), Some(&TagValue::Opaque {
        field_type: 8,
        count: 2,
        data: vec![0xFF, 0xFE, 0x01, 0x2C],
    }));
}

#[test]
fn test_malformed_zeroth_ifd_is_fatal() {
    let mut buffer = Vec::new();
    write_header::<BigEndian>(&mut buffer, 200);
    std::assert!(matches!(decode_tiff(&buffer), Err(ExifError::MalformedIfd { .. })));

    // Entry table longer than the block
    let mut buffer = Vec::new();
    write_header::<BigEndian>(&mut buffer, 8);
    buffer.write_u16::<BigEndian>(5).unwrap();
    std::assert!(matches!(decode_tiff(&buffer), Err(ExifError::MalformedIfd { .. })));
}

#[test]
fn test_bad_sub_ifd_pointer_is_an_issue() {
    type B = BigEndian;
    let mut buffer = Vec::new();
    write_header::<B>(&mut buffer, 8);
    buffer.write_u16::<B>(2).unwrap();
    write_entry::<B>(&mut buffer, image_tags::ORIENTATION, 3, 1, value_u16::<B>(3));
    write_entry::<B>(&mut buffer, image_tags::GPS_IFD_POINTER, 4, 1, value_u32::<B>(4096));
    buffer.write_u32::<B>(0).unwrap();

    let (doc, issues) = decode_tiff(&buffer).unwrap();

    std::assert_eq!(doc.get(IfdKind::Zeroth, image_tags::ORIENTATION), Some(&TagValue::Short(vec![3])));
    std::assert!(doc.gps.is_empty());
    std::assert!(matches!(issues.as_slice(), [ExifError::MalformedIfd { ifd, .. }] if ifd == "GPS"));
}

#[test]
fn test_thumbnail_is_extracted() {
    type B = LittleEndian;
    let mut buffer = Vec::new();
    write_header::<B>(&mut buffer, 8);

    // Empty 0th IFD chaining to the 1st IFD at 14
    buffer.write_u16::<B>(0).unwrap();
    buffer.write_u32::<B>(14).unwrap();

    buffer.write_u16::<B>(2).unwrap();
    write_entry::<B>(&mut buffer, image_tags::JPEG_INTERCHANGE_FORMAT, 4, 1, value_u32::<B>(44));
    write_entry::<B>(&mut buffer, image_tags::JPEG_INTERCHANGE_FORMAT_LENGTH, 4, 1, value_u32::<B>(4));
    buffer.write_u32::<B>(0).unwrap();
    std::assert_eq!(buffer.len(), 44);
    buffer.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xD9]);

    let (doc, issues) = decode_tiff(&buffer).unwrap();

    std::assert!(issues.is_empty());
    std::assert_eq!(doc.thumbnail, Some(vec![0xFF, 0xD8, 0xFF, 0xD9]));
    std::assert!(doc.first.is_empty());
}

#[test]
fn test_invalid_headers() {
    std::assert!(matches!(decode_tiff(b"MM\0\x2B\0\0\0\x08"), Err(ExifError::InvalidHeader(_))));
    std::assert!(matches!(decode_tiff(b"XX\0\x2A\0\0\0\x08"), Err(ExifError::InvalidByteOrder(_))));
    std::assert!(matches!(decode_tiff(b"MM\0"), Err(ExifError::InvalidHeader(_))));
}

#[test]
fn test_load_input_forms() {
    let block = little_endian_block();

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&block);

    let from_tiff = ExifDocument::load(&block).unwrap();
    let from_payload = ExifDocument::load(&payload).unwrap();
    std::assert_eq!(from_tiff, from_payload);

    let jpeg = crate::jpeg::insert(&payload, &minimal_jpeg()).unwrap();
    std::assert_eq!(ExifDocument::load(&jpeg).unwrap(), from_tiff);
}

#[test]
fn test_load_without_exif() {
    let doc = ExifDocument::load(&minimal_jpeg()).unwrap();
    std::assert!(doc.is_empty());

    std::assert!(matches!(ExifDocument::load(b"\x89PNG\r\n"), Err(ExifError::NotAJpeg)));
}
