use crate::error::{ProcessingError, Result};

/// Convert `DD:MM:SS` (or `DD:MM`) to decimal degrees
///
/// # Examples
/// ```
/// use amedas_processor::utils::dms_to_decimal;
///
/// let decimal = dms_to_decimal("43:03:24").unwrap();
/// assert!((decimal - 43.056667).abs() < 0.000001);
/// ```
pub fn dms_to_decimal(dms: &str) -> Result<f64> {
    let parts: Vec<&str> = dms.split(':').map(str::trim).collect();

    if !(2..=3).contains(&parts.len()) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Invalid DMS format: '{}'. Expected format: 'DD:MM:SS'",
            dms
        )));
    }

    let is_negative = dms.trim_start().starts_with('-');

    let component = |raw: &str, what: &str| {
        raw.parse::<f64>().map_err(|_| {
            ProcessingError::InvalidCoordinate(format!("Invalid {} value: '{}'", what, raw))
        })
    };

    let degrees = component(parts[0], "degrees")?;
    let minutes = component(parts[1], "minutes")?;
    let seconds = match parts.get(2) {
        Some(raw) => component(raw, "seconds")?,
        None => 0.0,
    };

    if !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Minutes and seconds must be in [0, 60): '{}'",
            dms
        )));
    }

    let decimal_value = degrees.abs() + minutes / 60.0 + seconds / 3600.0;

    if is_negative {
        Ok(-decimal_value)
    } else {
        Ok(decimal_value)
    }
}

/// Parse a coordinate written either in decimal degrees or as `DD:MM:SS`
pub fn parse_coordinate(coord_str: &str) -> Result<f64> {
    let trimmed = coord_str.trim();

    if trimmed.contains(':') {
        dms_to_decimal(trimmed)
    } else {
        trimmed.parse::<f64>().map_err(|_| {
            ProcessingError::InvalidCoordinate(format!("Invalid coordinate value: '{}'", coord_str))
        })
    }
}

/// Parse a latitude/longitude pair. A pair with either side blank is not
/// populated and yields `None`.
pub fn parse_coordinate_pair(latitude: &str, longitude: &str) -> Result<Option<(f64, f64)>> {
    let (latitude, longitude) = (latitude.trim(), longitude.trim());
    if latitude.is_empty() || longitude.is_empty() {
        return Ok(None);
    }

    let lat = parse_coordinate(latitude)?;
    let lon = parse_coordinate(longitude)?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            lat
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Longitude {} is outside [-180, 180]",
            lon
        )));
    }

    Ok(Some((lat, lon)))
}
