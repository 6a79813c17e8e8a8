use crate::models::{DailyNormal, DailyWbgt, MonthlyYearlyNormal, MonthlyYearlyWbgt, StationRecord};
use crate::processors::WbgtClimatology;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// The five output mappings, each keyed by station id in ascending order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Artifacts {
    pub daily_normal: BTreeMap<String, DailyNormal>,
    pub monthly_yearly_normal: BTreeMap<String, MonthlyYearlyNormal>,
    pub daily_wbgt: BTreeMap<String, DailyWbgt>,
    pub monthly_yearly_wbgt: BTreeMap<String, MonthlyYearlyWbgt>,
    pub station_index: BTreeMap<String, StationRecord>,
}

impl Artifacts {
    pub fn station_counts(&self) -> [(&'static str, usize); 5] {
        [
            ("daily normals", self.daily_normal.len()),
            ("monthly/yearly normals", self.monthly_yearly_normal.len()),
            ("daily WBGT", self.daily_wbgt.len()),
            ("monthly/yearly WBGT", self.monthly_yearly_wbgt.len()),
            ("station index", self.station_index.len()),
        ]
    }
}

/// Folds per-station results into [`Artifacts`]. A station only enters an
/// artifact when it brought at least one present value to it; the first
/// result seen for a station is kept.
#[derive(Debug, Default)]
pub struct OutputAssembler {
    artifacts: Artifacts,
}

impl OutputAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_daily_normal(&mut self, station_id: &str, normal: DailyNormal) -> bool {
        if normal.all_absent() {
            debug!("Station {}: no daily normals, left out", station_id);
            return false;
        }
        insert_first(&mut self.artifacts.daily_normal, station_id, normal, "daily normals")
    }

    pub fn add_monthly_yearly_normal(
        &mut self,
        station_id: &str,
        normal: MonthlyYearlyNormal,
    ) -> bool {
        if normal.is_empty() {
            debug!("Station {}: no monthly/yearly normals, left out", station_id);
            return false;
        }
        insert_first(
            &mut self.artifacts.monthly_yearly_normal,
            station_id,
            normal,
            "monthly/yearly normals",
        )
    }

    pub fn add_wbgt(&mut self, climatology: WbgtClimatology) -> bool {
        let WbgtClimatology {
            station_id,
            daily,
            monthly_yearly,
        } = climatology;

        if self.artifacts.monthly_yearly_wbgt.contains_key(&station_id) {
            warn!("Station {}: WBGT already assembled, ignoring duplicate", station_id);
            return false;
        }
        if !daily.is_empty() {
            self.artifacts.daily_wbgt.insert(station_id.clone(), daily);
        }
        self.artifacts.monthly_yearly_wbgt.insert(station_id, monthly_yearly);
        true
    }

    pub fn set_station_index(&mut self, records: BTreeMap<String, StationRecord>) {
        self.artifacts.station_index = records;
    }

    pub fn finish(self) -> Artifacts {
        self.artifacts
    }
}

fn insert_first<T>(
    map: &mut BTreeMap<String, T>,
    station_id: &str,
    value: T,
    artifact: &str,
) -> bool {
    if map.contains_key(station_id) {
        warn!("Station {}: {} already assembled, ignoring duplicate", station_id, artifact);
        return false;
    }
    map.insert(station_id.to_string(), value);
    true
}
