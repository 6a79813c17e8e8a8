use crate::models::{MonthlyDaySeries, NormalizedValue, PerElement, Series};
use serde::Serialize;

/// Daily normals of one station: per element, month -> 31-day series
pub type DailyNormal = PerElement<Option<MonthlyDaySeries>>;

/// Monthly and annual normals of one station
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyYearlyNormal {
    pub monthly: PerElement<Option<Series>>,
    pub yearly: PerElement<NormalizedValue>,
}

impl MonthlyYearlyNormal {
    pub fn is_empty(&self) -> bool {
        self.monthly.all_absent() && self.yearly.all_absent()
    }
}
