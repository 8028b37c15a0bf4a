//! Photo metadata reports
//!
//! Builds the human-readable summaries printed by the CLI: device,
//! capture time, location, altitude, camera direction and speed, plus a
//! raw per-section tag listing.

use std::fmt;

use log::warn;

use crate::exif::constants::{exif_tags, gps_tags, image_tags};
use crate::exif::errors::ExifResult;
use crate::exif::types::{ExifDocument, IfdKind};
use crate::gps::coordinate::{decimal_to_dms, GpsCoordinate};
use crate::gps::format::{degrees_to_direction, format_altitude, format_direction_ref, format_speed_ref};
use crate::utils::{string_utils, tag_utils};

/// Direction the camera was facing
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDirection {
    pub degrees: f64,
    pub reference: Option<String>,
}

impl ImageDirection {
    /// Nearest of the 16 compass points
    pub fn compass_point(&self) -> &'static str {
        degrees_to_direction(self.degrees)
    }
}

/// Summary of the metadata of one photo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoReport {
    pub make: Option<String>,
    pub model: Option<String>,
    pub software: Option<String>,
    pub date_time: Option<String>,
    /// DateTimeOriginal with SubSecTimeOriginal appended when present
    pub date_time_original: Option<String>,
    pub coordinates: Option<GpsCoordinate>,
    /// Altitude in meters and its sea level reference
    pub altitude: Option<(f64, Option<u8>)>,
    pub direction: Option<ImageDirection>,
    /// Speed and its unit reference letter
    pub speed: Option<(f64, Option<String>)>,
}

/// Keeps a readable field, logging and dropping an undecodable one
fn readable<T>(field: &str, value: ExifResult<Option<T>>) -> Option<T> {
    value.unwrap_or_else(|e| {
        warn!("Ignoring unreadable {}: {}", field, e);
        None
    })
}

fn ascii(doc: &ExifDocument, kind: IfdKind, tag: u16) -> Option<String> {
    doc.get(kind, tag)
        .and_then(|value| value.as_ascii())
        .map(|s| string_utils::trim_trailing_nulls(s).to_string())
}

fn rational(doc: &ExifDocument, kind: IfdKind, tag: u16) -> ExifResult<Option<f64>> {
    match doc.get(kind, tag).and_then(|value| value.as_rational()) {
        Some(r) => r.to_f64().map(Some),
        None => Ok(None),
    }
}

impl PhotoReport {
    /// Collects the report fields from a document
    ///
    /// Fields whose tags are absent or unreadable are left empty.
    pub fn from_document(doc: &ExifDocument) -> Self {
        let date_time_original = ascii(doc, IfdKind::Exif, exif_tags::DATE_TIME_ORIGINAL).map(|dto| {
            match ascii(doc, IfdKind::Exif, exif_tags::SUB_SEC_TIME_ORIGINAL) {
                Some(subsec) => format!("{}.{}", dto, subsec),
                None => dto,
            }
        });

        let altitude = readable("altitude", rational(doc, IfdKind::Gps, gps_tags::GPS_ALTITUDE)).map(|meters| {
            let reference = doc.get(IfdKind::Gps, gps_tags::GPS_ALTITUDE_REF)
                .and_then(|value| value.as_u32())
                .and_then(|r| u8::try_from(r).ok());
            (meters, reference)
        });

        let direction = readable("image direction", rational(doc, IfdKind::Gps, gps_tags::GPS_IMG_DIRECTION))
            .map(|degrees| ImageDirection {
                degrees,
                reference: ascii(doc, IfdKind::Gps, gps_tags::GPS_IMG_DIRECTION_REF),
            });

        let speed = readable("speed", rational(doc, IfdKind::Gps, gps_tags::GPS_SPEED))
            .map(|speed| (speed, ascii(doc, IfdKind::Gps, gps_tags::GPS_SPEED_REF)));

        PhotoReport {
            make: ascii(doc, IfdKind::Zeroth, image_tags::MAKE),
            model: ascii(doc, IfdKind::Zeroth, image_tags::MODEL),
            software: ascii(doc, IfdKind::Zeroth, image_tags::SOFTWARE),
            date_time: ascii(doc, IfdKind::Zeroth, image_tags::DATE_TIME),
            date_time_original,
            coordinates: readable("coordinates", doc.gps_coordinates()),
            altitude,
            direction,
            speed,
        }
    }
}

fn or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(unknown)")
}

/// Degrees, minutes and seconds of an unsigned angle
fn dms_text(degrees: f64) -> String {
    match decimal_to_dms(degrees.abs()) {
        Ok(parts) => match parts.as_slice() {
            [d, m, s] => format!(
                "{}° {}' {}\"",
                d.to_f64().unwrap_or(0.0),
                m.to_f64().unwrap_or(0.0),
                s.to_f64().unwrap_or(0.0)
            ),
            _ => degrees.abs().to_string(),
        },
        Err(_) => degrees.abs().to_string(),
    }
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "-".repeat(title.len()))
}

impl fmt::Display for PhotoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "Device information")?;
        writeln!(f, "Make: {}", or_unknown(&self.make))?;
        writeln!(f, "Model: {}", or_unknown(&self.model))?;
        writeln!(f, "OS version: {}", or_unknown(&self.software))?;
        writeln!(f)?;

        heading(f, "Date/time taken")?;
        writeln!(f, "DateTime: {}", or_unknown(&self.date_time))?;
        writeln!(f, "DateTimeOriginal: {}", or_unknown(&self.date_time_original))?;

        if let Some(position) = &self.coordinates {
            writeln!(f)?;
            heading(f, "Coordinates")?;
            writeln!(f, "Latitude: {} {} ({})", dms_text(position.latitude), position.latitude_ref(), position.latitude)?;
            writeln!(f, "Longitude: {} {} ({})", dms_text(position.longitude), position.longitude_ref(), position.longitude)?;
            writeln!(f, "Map: {}", position.map_url())?;
        }

        if let Some((meters, reference)) = self.altitude {
            writeln!(f)?;
            heading(f, "Altitude")?;
            writeln!(f, "{}", format_altitude(meters, reference))?;
        }

        if let Some(direction) = &self.direction {
            writeln!(f)?;
            heading(f, "Image direction")?;
            writeln!(f, "Image direction: {} ({}°)", direction.compass_point(), direction.degrees)?;
            writeln!(f, "Image direction ref: {}", format_direction_ref(direction.reference.as_deref()))?;
        }

        if let Some((speed, reference)) = &self.speed {
            writeln!(f)?;
            heading(f, "Speed")?;
            writeln!(f, "Speed: {} {}", speed, format_speed_ref(reference.as_deref()))?;
        }

        Ok(())
    }
}

/// Lists every tag of every section by registry name
pub fn dump_document(doc: &ExifDocument) -> String {
    let mut lines = Vec::new();

    for (kind, section) in doc.sections() {
        lines.push(format!("- {}", kind));
        for (tag, value) in section {
            lines.push(format!("    - {}", tag_utils::describe_entry(kind, *tag, value)));
        }
    }

    match &doc.thumbnail {
        Some(thumbnail) => lines.push(format!("- thumbnail: {} bytes", thumbnail.len())),
        None => lines.push("- thumbnail: null".to_string()),
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::rational::Rational;
    use crate::exif::types::TagValue;

    fn document() -> ExifDocument {
        let mut doc = ExifDocument::new();
        doc.set(IfdKind::Zeroth, image_tags::MAKE, TagValue::ascii("Apple")).unwrap();
        doc.set(IfdKind::Exif, exif_tags::DATE_TIME_ORIGINAL, TagValue::ascii("2020:12:07 15:39:38")).unwrap();
        doc.set(IfdKind::Exif, exif_tags::SUB_SEC_TIME_ORIGINAL, TagValue::ascii("615")).unwrap();
        doc.set(IfdKind::Gps, gps_tags::GPS_ALTITUDE, TagValue::Rational(vec![Rational::new(125, 10)])).unwrap();
        doc.set(IfdKind::Gps, gps_tags::GPS_ALTITUDE_REF, TagValue::Byte(vec![1])).unwrap();
        doc.set(IfdKind::Gps, gps_tags::GPS_IMG_DIRECTION, TagValue::Rational(vec![Rational::new(90, 1)])).unwrap();
        doc.set(IfdKind::Gps, gps_tags::GPS_IMG_DIRECTION_REF, TagValue::ascii("T")).unwrap();
        doc
    }

    #[test]
    fn collects_fields() {
        let report = PhotoReport::from_document(&document());

        assert_eq!(report.make.as_deref(), Some("Apple"));
        assert_eq!(report.model, None);
        assert_eq!(report.date_time_original.as_deref(), Some("2020:12:07 15:39:38.615"));
        assert_eq!(report.altitude, Some((12.5, Some(1))));
        assert_eq!(report.direction.as_ref().map(|d| d.compass_point()), Some("E"));
        assert_eq!(report.coordinates, None);
    }

    #[test]
    fn renders_sections() {
        let text = PhotoReport::from_document(&document()).to_string();

        assert!(text.contains("Make: Apple"));
        assert!(text.contains("Model: (unknown)"));
        assert!(text.contains("12.5 meters below sea level"));
        assert!(text.contains("Image direction: E (90°)"));
        assert!(text.contains("Image direction ref: true north"));
        assert!(!text.contains("Speed"));
    }

    #[test]
    fn renders_coordinates_as_dms() {
        let mut doc = ExifDocument::new();
        doc.set_gps_coordinates(-33.5, 151.25).unwrap();
        let text = PhotoReport::from_document(&doc).to_string();

        assert!(text.contains("Latitude: 33° 30' 0\" S (-33.5)"));
        assert!(text.contains("Longitude: 151° 15' 0\" E (151.25)"));
        assert!(text.contains("Map: https://www.google.com/maps?q=-33.5,151.25"));
    }

    #[test]
    fn unreadable_values_are_skipped() {
        let mut doc = ExifDocument::new();
        doc.set(IfdKind::Gps, gps_tags::GPS_SPEED, TagValue::Rational(vec![Rational::new(5, 0)])).unwrap();

        assert_eq!(PhotoReport::from_document(&doc).speed, None);
    }

    #[test]
    fn dumps_every_section() {
        let text = dump_document(&document());

        assert!(text.starts_with("- 0th\n    - Make (271, ASCII): Apple"));
        assert!(text.contains("- GPS\n    - GPSAltitudeRef (5, BYTE): [1]"));
        assert!(text.ends_with("- thumbnail: null"));
    }
}
