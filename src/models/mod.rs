pub mod element;
pub mod normals;
pub mod series;
pub mod station;
pub mod wbgt;
pub mod wide_row;

pub use element::{ElementCode, PerElement};
pub use normals::{DailyNormal, MonthlyYearlyNormal};
pub use series::{collapse_months, MonthlyDaySeries, NormalizedValue, Series};
pub use station::{CoordinateSource, StationRecord, StationRow};
pub use wbgt::{DailyStats, DailyWbgt, HourlyReading, MonthDay, MonthlyYearlyWbgt, StationReadings};
pub use wide_row::{CalendarUnit, Granularity, RawCell, UnitColumns, WideRow};
