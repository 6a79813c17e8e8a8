use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// One hourly WBGT observation with a present value
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyReading {
    pub date: NaiveDate,
    pub hour: Option<u32>,
    pub value: f64,
}

impl HourlyReading {
    pub fn new(date: NaiveDate, hour: Option<u32>, value: f64) -> Self {
        Self { date, hour, value }
    }
}

/// Every reading loaded from one station directory
#[derive(Debug, Clone, PartialEq)]
pub struct StationReadings {
    pub station_id: String,
    pub file_count: usize,
    pub readings: Vec<HourlyReading>,
}

/// Calendar day independent of year. Orders chronologically and serializes
/// as `"M/D"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }
}

impl std::fmt::Display for MonthDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.month, self.day)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Day-of-year WBGT climatology for one station
pub type DailyWbgt = BTreeMap<MonthDay, DailyStats>;

/// Month and whole-period WBGT means for one station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyYearlyWbgt {
    pub yearly: f64,
    pub monthly: BTreeMap<u32, f64>,
}
