//! Human-readable formatting of GPS measurements

/// The 16 compass points, clockwise from north
const COMPASS_DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

/// Formats an altitude with its sea level reference
///
/// Reference 0 is above sea level and 1 below; anything else, or a
/// missing reference, is reported as unspecified.
pub fn format_altitude(altitude: f64, altitude_ref: Option<u8>) -> String {
    let reference = match altitude_ref {
        Some(0) => "above sea level",
        Some(1) => "below sea level",
        _ => "(above or below sea level not specified)",
    };
    format!("{} meters {}", altitude, reference)
}

/// Maps a compass heading in degrees to the nearest of 16 compass points
pub fn degrees_to_direction(degrees: f64) -> &'static str {
    let arc = 360.0 / COMPASS_DIRECTIONS.len() as f64;
    let index = (degrees / arc).round().rem_euclid(COMPASS_DIRECTIONS.len() as f64) as usize;
    COMPASS_DIRECTIONS[index % COMPASS_DIRECTIONS.len()]
}

/// Describes the north reference of a direction
pub fn format_direction_ref(direction_ref: Option<&str>) -> &'static str {
    match direction_ref.map(str::trim) {
        Some("T") => "true north",
        Some("M") => "magnetic north",
        _ => "(true or magnetic north not specified)",
    }
}

/// Describes the unit of a speed
pub fn format_speed_ref(speed_ref: Option<&str>) -> &'static str {
    match speed_ref.map(str::trim) {
        Some("K") => "km/h",
        Some("M") => "mph",
        Some("N") => "knots",
        _ => "(speed units not specified)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn altitude_reference() {
        assert_eq!(format_altitude(12.5, Some(0)), "12.5 meters above sea level");
        assert_eq!(format_altitude(3.0, Some(1)), "3 meters below sea level");
        assert_eq!(format_altitude(7.0, None), "7 meters (above or below sea level not specified)");
    }

    #[test]
    fn compass_points() {
        assert_eq!(degrees_to_direction(0.0), "N");
        assert_eq!(degrees_to_direction(22.5), "NNE");
        assert_eq!(degrees_to_direction(181.0), "S");
        assert_eq!(degrees_to_direction(350.0), "N");
        assert_eq!(degrees_to_direction(-90.0), "W");
    }

    #[test]
    fn reference_texts() {
        assert_eq!(format_direction_ref(Some("T")), "true north");
        assert_eq!(format_direction_ref(Some("M")), "magnetic north");
        assert_eq!(format_direction_ref(None), "(true or magnetic north not specified)");
        assert_eq!(format_speed_ref(Some("N")), "knots");
        assert_eq!(format_speed_ref(Some("X")), "(speed units not specified)");
    }
}
