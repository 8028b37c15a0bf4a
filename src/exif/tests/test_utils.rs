use byteorder::{ByteOrder, WriteBytesExt};

use crate::exif::constants::{exif_tags, gps_tags, image_tags};
use crate::exif::rational::{Rational, SRational};
use crate::exif::types::{ExifDocument, IfdKind, TagValue};

/// Writes a TIFF header pointing at the given 0th IFD offset
pub fn write_header<B: ByteOrder>(buffer: &mut Vec<u8>, first_ifd: u32) {
    let marker: &[u8] = if B::read_u16(&[1, 0]) == 1 { b"II" } else { b"MM" };
    buffer.extend_from_slice(marker);
    buffer.write_u16::<B>(42).unwrap();
    buffer.write_u32::<B>(first_ifd).unwrap();
}

/// Writes one 12-byte IFD entry with a raw value field
pub fn write_entry<B: ByteOrder>(buffer: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: [u8; 4]) {
    buffer.write_u16::<B>(tag).unwrap();
    buffer.write_u16::<B>(field_type).unwrap();
    buffer.write_u32::<B>(count).unwrap();
    buffer.extend_from_slice(&value);
}

/// Encodes a u32 as an entry value field
pub fn value_u32<B: ByteOrder>(value: u32) -> [u8; 4] {
    let mut field = [0u8; 4];
    B::write_u32(&mut field, value);
    field
}

/// Encodes a single u16 as a left-justified entry value field
pub fn value_u16<B: ByteOrder>(value: u16) -> [u8; 4] {
    let mut field = [0u8; 4];
    B::write_u16(&mut field[..2], value);
    field
}

/// A document touching every section and value type
pub fn sample_document() -> ExifDocument {
    let mut doc = ExifDocument::new();

    doc.set(IfdKind::Zeroth, image_tags::MAKE, TagValue::ascii("Apple")).unwrap();
    doc.set(IfdKind::Zeroth, image_tags::MODEL, TagValue::ascii("iPhone 12 Pro")).unwrap();
    doc.set(IfdKind::Zeroth, image_tags::ORIENTATION, TagValue::Short(vec![1])).unwrap();
    doc.set(IfdKind::Zeroth, image_tags::X_RESOLUTION, TagValue::Rational(vec![Rational::new(72, 1)])).unwrap();
    doc.set(IfdKind::Zeroth, image_tags::SOFTWARE, TagValue::ascii("14.2.1")).unwrap();
    doc.set(IfdKind::Zeroth, image_tags::DATE_TIME, TagValue::ascii("2020:12:07 15:39:38")).unwrap();

    doc.set(IfdKind::Exif, exif_tags::EXPOSURE_TIME, TagValue::Rational(vec![Rational::new(1, 120)])).unwrap();
    doc.set(IfdKind::Exif, exif_tags::ISO_SPEED_RATINGS, TagValue::Short(vec![32])).unwrap();
    doc.set(IfdKind::Exif, exif_tags::EXIF_VERSION, TagValue::Undefined(b"0232".to_vec())).unwrap();
    doc.set(IfdKind::Exif, exif_tags::DATE_TIME_ORIGINAL, TagValue::ascii("2020:12:07 15:39:38")).unwrap();
    doc.set(IfdKind::Exif, exif_tags::SUB_SEC_TIME_ORIGINAL, TagValue::ascii("615")).unwrap();
    doc.set(IfdKind::Exif, 37380, TagValue::SRational(vec![SRational::new(-2, 3)])).unwrap();
    doc.set(IfdKind::Exif, exif_tags::PIXEL_X_DIMENSION, TagValue::Long(vec![4032])).unwrap();

    doc.set(IfdKind::Gps, gps_tags::GPS_VERSION_ID, TagValue::Byte(vec![2, 2, 0, 0])).unwrap();
    doc.set(IfdKind::Gps, gps_tags::GPS_LATITUDE_REF, TagValue::ascii("N")).unwrap();
    doc.set(IfdKind::Gps, gps_tags::GPS_LATITUDE, TagValue::Rational(vec![
        Rational::new(37, 1), Rational::new(14, 1), Rational::new(36, 10),
    ])).unwrap();
    doc.set(IfdKind::Gps, gps_tags::GPS_LONGITUDE_REF, TagValue::ascii("W")).unwrap();
    doc.set(IfdKind::Gps, gps_tags::GPS_LONGITUDE, TagValue::Rational(vec![
        Rational::new(115, 1), Rational::new(48, 1), Rational::new(2399, 100),
    ])).unwrap();
    doc.set(IfdKind::Gps, gps_tags::GPS_ALTITUDE_REF, TagValue::Byte(vec![0])).unwrap();
    doc.set(IfdKind::Gps, gps_tags::GPS_ALTITUDE, TagValue::Rational(vec![Rational::new(13_573, 10)])).unwrap();

    doc.set(IfdKind::Interop, 1, TagValue::ascii("R98")).unwrap();

    doc.set(IfdKind::First, 259, TagValue::Short(vec![6])).unwrap();
    doc.thumbnail = Some(vec![0xFF, 0xD8, 0x01, 0x02, 0x03, 0xFF, 0xD9]);

    doc
}

/// A small JPEG with APP0, a quantization table and scan data
pub fn minimal_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x07, b'J', b'F', b'I', b'F', 0x00]);
    data.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x04, 0x00, 0x01]);
    data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0x8A, 0xFF, 0x00, 0x3C, 0xFF, 0xD9]);
    data
}
