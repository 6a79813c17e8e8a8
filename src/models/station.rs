use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which gauge a metadata row's coordinate pair came from. Declaration order
/// is preference order: precipitation beats snow at the same end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSource {
    Precipitation,
    Snow,
}

impl CoordinateSource {
    pub const PREFERENCE: [CoordinateSource; 2] =
        [CoordinateSource::Precipitation, CoordinateSource::Snow];
}

/// One validity period of one station as read from the metadata table.
/// Blank text fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationRow {
    pub station_id: String,
    pub station_name: String,
    pub prefecture_subprefecture: String,
    pub long_name: String,
    pub address: String,
    pub altitude: Option<f64>,
    pub precipitation: Option<(f64, f64)>,
    pub snow: Option<(f64, f64)>,
    /// `None` while the period is still open
    pub end_date: Option<NaiveDate>,
}

impl StationRow {
    pub fn coordinates(&self, source: CoordinateSource) -> Option<(f64, f64)> {
        match source {
            CoordinateSource::Precipitation => self.precipitation,
            CoordinateSource::Snow => self.snow,
        }
    }

    /// Most preferred populated pair on this row
    pub fn preferred_coordinates(&self) -> Option<(CoordinateSource, (f64, f64))> {
        CoordinateSource::PREFERENCE
            .iter()
            .find_map(|source| self.coordinates(*source).map(|pair| (*source, pair)))
    }

    /// Sort key for "most recent": open periods rank after every dated one
    pub fn validity_key(&self) -> NaiveDate {
        self.end_date.unwrap_or(NaiveDate::MAX)
    }
}

/// Resolved station entry written to the station index. Fields no row
/// supplied are `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationRecord {
    #[serde(skip)]
    pub station_id: String,

    #[validate(length(min = 1))]
    pub station_name: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    pub altitude: Option<f64>,
    pub prefecture_subprefecture: Option<String>,
    pub long_name: Option<String>,
    pub address: Option<String>,
    pub end_date: Option<NaiveDate>,
}

impl StationRecord {
    /// Names of the fields the consumer needs that are still `null`
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.station_name.is_none() {
            missing.push("station_name");
        }
        if self.latitude.is_none() || self.longitude.is_none() {
            missing.push("coordinates");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(precipitation: Option<(f64, f64)>, snow: Option<(f64, f64)>) -> StationRow {
        StationRow {
            station_id: "47401".to_string(),
            station_name: "Wakkanai".to_string(),
            precipitation,
            snow,
            ..StationRow::default()
        }
    }

    #[test]
    fn test_precipitation_pair_is_preferred() {
        let r = row(Some((45.41, 141.68)), Some((45.40, 141.67)));
        assert_eq!(
            r.preferred_coordinates(),
            Some((CoordinateSource::Precipitation, (45.41, 141.68)))
        );
    }

    #[test]
    fn test_snow_pair_fallback() {
        let r = row(None, Some((45.40, 141.67)));
        assert_eq!(
            r.preferred_coordinates(),
            Some((CoordinateSource::Snow, (45.40, 141.67)))
        );
        assert_eq!(row(None, None).preferred_coordinates(), None);
    }

    #[test]
    fn test_open_period_ranks_latest() {
        let mut dated = row(None, None);
        dated.end_date = NaiveDate::from_ymd_opt(2021, 1, 1);
        assert!(row(None, None).validity_key() > dated.validity_key());
    }

    #[test]
    fn test_station_record_validation() {
        let mut record = StationRecord {
            station_id: "47401".to_string(),
            station_name: Some("Wakkanai".to_string()),
            latitude: Some(45.415),
            longitude: Some(141.678),
            ..StationRecord::default()
        };
        assert!(record.validate().is_ok());
        assert!(record.missing_fields().is_empty());

        record.latitude = Some(91.0);
        assert!(record.validate().is_err());

        record.latitude = None;
        assert!(record.validate().is_ok());
        assert_eq!(record.missing_fields(), vec!["coordinates"]);
    }

    #[test]
    fn test_station_record_serialization_skips_id() {
        let record = StationRecord {
            station_id: "47401".to_string(),
            station_name: Some("Wakkanai".to_string()),
            latitude: Some(45.5),
            longitude: Some(141.5),
            altitude: Some(2.8),
            prefecture_subprefecture: Some("Soya".to_string()),
            long_name: Some("Wakkanai Local Meteorological Office".to_string()),
            address: Some("Wakkanai-shi Kaiun".to_string()),
            end_date: NaiveDate::from_ymd_opt(2021, 1, 1),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"station_name":"Wakkanai","latitude":45.5,"longitude":141.5,"#,
                r#""altitude":2.8,"prefecture_subprefecture":"Soya","#,
                r#""long_name":"Wakkanai Local Meteorological Office","#,
                r#""address":"Wakkanai-shi Kaiun","end_date":"2021-01-01"}"#
            )
        );
    }

    #[test]
    fn test_unresolved_fields_serialize_as_null() {
        let record = StationRecord {
            station_id: "11001".to_string(),
            ..StationRecord::default()
        };
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["latitude"], serde_json::Value::Null);
        assert_eq!(json["station_name"], serde_json::Value::Null);
        assert_eq!(record.missing_fields(), vec!["station_name", "coordinates"]);
    }
}
