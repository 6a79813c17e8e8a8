use crate::models::{StationRecord, StationRow};
use std::collections::BTreeMap;
use tracing::warn;
use validator::Validate;

/// Station emitted with fields the consumer needs still `null`, or left out
/// because its record failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedStation {
    pub station_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedStations {
    /// Ordered by station id
    pub records: BTreeMap<String, StationRecord>,
    pub unresolved: Vec<UnresolvedStation>,
}

/// Every row seen for one station, in input order
#[derive(Debug, Default)]
struct Candidates<'a> {
    rows: Vec<&'a StationRow>,
}

impl<'a> Candidates<'a> {
    /// Value from the latest row `pick` accepts; the first such row wins a tie
    fn latest<T>(&self, pick: impl Fn(&'a StationRow) -> Option<T>) -> Option<T> {
        let mut best: Option<(chrono::NaiveDate, T)> = None;
        for &row in &self.rows {
            let key = row.validity_key();
            if best.as_ref().map_or(false, |(best_key, _)| key <= *best_key) {
                continue;
            }
            if let Some(value) = pick(row) {
                best = Some((key, value));
            }
        }
        best.map(|(_, value)| value)
    }

    fn latest_text(&self, text: impl Fn(&StationRow) -> &str) -> Option<String> {
        self.latest(|row| Some(text(row)).filter(|t| !t.is_empty()).map(str::to_string))
    }

    /// Later end date wins; at the same end date the precipitation gauge wins
    fn coordinates(&self) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                row.preferred_coordinates()
                    .map(|(source, pair)| ((row.validity_key(), source, i), pair))
            })
            .max_by(|(a, _), (b, _)| {
                a.0.cmp(&b.0)
                    .then_with(|| b.1.cmp(&a.1))
                    .then_with(|| b.2.cmp(&a.2))
            })
            .map(|(_, pair)| pair)
    }
}

/// Collapses the station metadata table to one record per station
#[derive(Debug, Clone, Copy, Default)]
pub struct StationIndexResolver;

impl StationIndexResolver {
    pub fn new() -> Self {
        Self
    }

    /// Each field comes from the latest row that populates it, so a closed
    /// period can still supply what the open one leaves blank. Stations are
    /// kept even when no row has a name or coordinates; those fields stay
    /// `null` and the station is listed as unresolved.
    pub fn resolve(&self, rows: &[StationRow]) -> ResolvedStations {
        let mut by_station: BTreeMap<&str, Candidates> = BTreeMap::new();
        for row in rows {
            by_station
                .entry(row.station_id.as_str())
                .or_default()
                .rows
                .push(row);
        }

        let mut resolved = ResolvedStations::default();

        for (station_id, candidates) in by_station {
            let record = Self::build_record(station_id, &candidates);

            if let Err(e) = record.validate() {
                warn!("Leaving station {} out of the index: {}", station_id, e);
                resolved.unresolved.push(UnresolvedStation {
                    station_id: station_id.to_string(),
                    reason: e.to_string(),
                });
                continue;
            }

            let missing = record.missing_fields();
            if !missing.is_empty() {
                let reason = format!("no row carries {}", missing.join(" or "));
                warn!("Station {} is incomplete: {}", station_id, reason);
                resolved.unresolved.push(UnresolvedStation {
                    station_id: station_id.to_string(),
                    reason,
                });
            }

            resolved.records.insert(station_id.to_string(), record);
        }

        resolved
    }

    fn build_record(station_id: &str, candidates: &Candidates) -> StationRecord {
        let (latitude, longitude) = candidates.coordinates().unzip();

        StationRecord {
            station_id: station_id.to_string(),
            station_name: candidates.latest_text(|row| row.station_name.as_str()),
            latitude,
            longitude,
            altitude: candidates.latest(|row| row.altitude),
            prefecture_subprefecture: candidates
                .latest_text(|row| row.prefecture_subprefecture.as_str()),
            long_name: candidates.latest_text(|row| row.long_name.as_str()),
            address: candidates.latest_text(|row| row.address.as_str()),
            end_date: candidates.latest(|row| Some(row.end_date)).flatten(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn row(
        id: &str,
        name: &str,
        precipitation: Option<(f64, f64)>,
        snow: Option<(f64, f64)>,
        end_date: Option<(i32, u32, u32)>,
    ) -> StationRow {
        StationRow {
            station_id: id.to_string(),
            station_name: name.to_string(),
            precipitation,
            snow,
            end_date: end_date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..StationRow::default()
        }
    }

    fn coordinates(record: &StationRecord) -> (Option<f64>, Option<f64>) {
        (record.latitude, record.longitude)
    }

    #[test]
    fn test_latest_non_empty_pair_wins() {
        let rows = vec![
            row("47401", "Wakkanai (old)", Some((45.40, 141.60)), None, Some((2020, 1, 1))),
            row("47401", "Wakkanai", None, Some((45.41, 141.68)), Some((2021, 1, 1))),
        ];

        let resolved = StationIndexResolver::new().resolve(&rows);
        let record = &resolved.records["47401"];

        assert_eq!(coordinates(record), (Some(45.41), Some(141.68)));
        assert_eq!(record.station_name.as_deref(), Some("Wakkanai"));
        assert_eq!(record.end_date, NaiveDate::from_ymd_opt(2021, 1, 1));
        assert!(resolved.unresolved.is_empty());
    }

    #[test]
    fn test_precipitation_preferred_on_same_date() {
        let rows = vec![
            row("47401", "Wakkanai", None, Some((45.0, 141.0)), Some((2021, 1, 1))),
            row("47401", "Wakkanai", Some((46.0, 142.0)), None, Some((2021, 1, 1))),
        ];

        let record = &StationIndexResolver::new().resolve(&rows).records["47401"];
        assert_eq!(coordinates(record), (Some(46.0), Some(142.0)));
    }

    #[test]
    fn test_precipitation_preferred_within_row() {
        let rows = vec![row("47401", "Wakkanai", Some((46.0, 142.0)), Some((45.0, 141.0)), None)];

        let record = &StationIndexResolver::new().resolve(&rows).records["47401"];
        assert_eq!(coordinates(record), (Some(46.0), Some(142.0)));
    }

    #[test]
    fn test_first_row_wins_a_full_tie() {
        let rows = vec![
            row("47401", "First", Some((45.0, 141.0)), None, None),
            row("47401", "Second", Some((46.0, 142.0)), None, None),
        ];

        let record = &StationIndexResolver::new().resolve(&rows).records["47401"];
        assert_eq!(record.station_name.as_deref(), Some("First"));
        assert_eq!(coordinates(record), (Some(45.0), Some(141.0)));
    }

    #[test]
    fn test_name_independent_of_coordinates() {
        // the open row has a name but no coordinates
        let rows = vec![
            row("47401", "Old name", Some((45.0, 141.0)), None, Some((2019, 3, 31))),
            row("47401", "New name", None, None, None),
        ];

        let record = &StationIndexResolver::new().resolve(&rows).records["47401"];
        assert_eq!(record.station_name.as_deref(), Some("New name"));
        assert_eq!(coordinates(record), (Some(45.0), Some(141.0)));
        assert_eq!(record.end_date, None);
    }

    #[test]
    fn test_open_period_beats_dated_rows() {
        let rows = vec![
            row("47401", "Current", Some((45.5, 141.5)), None, None),
            row("47401", "Closed", Some((45.0, 141.0)), None, Some((2024, 1, 1))),
        ];

        let record = &StationIndexResolver::new().resolve(&rows).records["47401"];
        assert_eq!(record.station_name.as_deref(), Some("Current"));
        assert_eq!(record.latitude, Some(45.5));
    }

    #[test]
    fn test_descriptive_fields_from_latest_populated_row() {
        let rows = vec![
            StationRow {
                altitude: Some(2.8),
                address: "Wakkanai-shi Kaiun".to_string(),
                prefecture_subprefecture: "Soya".to_string(),
                long_name: "Wakkanai (old site)".to_string(),
                ..row("47401", "Wakkanai", Some((45.40, 141.60)), None, Some((2020, 1, 1)))
            },
            StationRow {
                long_name: "Wakkanai Local Meteorological Office".to_string(),
                ..row("47401", "Wakkanai", Some((45.41, 141.68)), None, None)
            },
        ];

        let record = &StationIndexResolver::new().resolve(&rows).records["47401"];
        assert_eq!(record.altitude, Some(2.8));
        assert_eq!(record.address.as_deref(), Some("Wakkanai-shi Kaiun"));
        assert_eq!(record.prefecture_subprefecture.as_deref(), Some("Soya"));
        assert_eq!(
            record.long_name.as_deref(),
            Some("Wakkanai Local Meteorological Office")
        );
    }

    #[test]
    fn test_ordered_by_station_id() {
        let rows = vec![
            row("62078", "Osaka", Some((34.68, 135.52)), None, None),
            row("11001", "Soya", Some((45.52, 141.93)), None, None),
            row("47401", "Wakkanai", Some((45.41, 141.68)), None, None),
        ];

        let resolved = StationIndexResolver::new().resolve(&rows);
        let ids: Vec<&str> = resolved.records.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["11001", "47401", "62078"]);
    }

    #[test]
    fn test_station_without_coordinates_is_kept_with_nulls() {
        let rows = vec![
            row("47401", "Wakkanai", Some((45.41, 141.68)), None, None),
            row("11001", "Soya", None, None, None),
            row("47402", "", Some((45.0, 141.0)), None, None),
        ];

        let resolved = StationIndexResolver::new().resolve(&rows);
        assert_eq!(resolved.records.len(), 3);

        let soya = &resolved.records["11001"];
        assert_eq!(soya.station_name.as_deref(), Some("Soya"));
        assert_eq!(coordinates(soya), (None, None));
        assert_eq!(resolved.records["47402"].station_name, None);

        let ids: Vec<&str> = resolved
            .unresolved
            .iter()
            .map(|s| s.station_id.as_str())
            .collect();
        assert_eq!(ids, vec!["11001", "47402"]);
        assert!(resolved.unresolved[0].reason.contains("coordinates"));
    }

    #[test]
    fn test_out_of_range_coordinates_leave_the_index() {
        let rows = vec![row("47401", "Wakkanai", Some((95.0, 141.0)), None, None)];

        let resolved = StationIndexResolver::new().resolve(&rows);
        assert!(resolved.records.is_empty());
        assert_eq!(resolved.unresolved.len(), 1);
    }
}
