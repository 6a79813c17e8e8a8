use serde::Serialize;
use std::collections::BTreeMap;

/// A scaled reading, `None` when the source marked it missing
pub type NormalizedValue = Option<f64>;

/// Ordered values for one (station, element), indexed by calendar unit
/// position. Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series(Vec<NormalizedValue>);

impl Series {
    pub fn new(values: Vec<NormalizedValue>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[NormalizedValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_all_absent(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// All-or-nothing: a series with no present value becomes absent
    pub fn collapse(self) -> Option<Self> {
        if self.is_all_absent() {
            None
        } else {
            Some(self)
        }
    }
}

/// Daily normals for one element: month -> that month's day series
pub type MonthlyDaySeries = BTreeMap<u32, Option<Series>>;

/// Collapse a month map whose every month is absent (or which has no months)
pub fn collapse_months(months: MonthlyDaySeries) -> Option<MonthlyDaySeries> {
    if months.values().all(Option::is_none) {
        None
    } else {
        Some(months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_all_absent() {
        let series = Series::new(vec![None, None, None]);
        assert_eq!(series.collapse(), None);
    }

    #[test]
    fn test_collapse_keeps_partial_series() {
        let series = Series::new(vec![None, Some(1.5), None]);
        let kept = series.clone().collapse();
        assert_eq!(kept, Some(series));
    }

    #[test]
    fn test_series_serializes_as_array() {
        let series = Series::new(vec![Some(10.0), None, Some(10.2)]);
        assert_eq!(serde_json::to_string(&series).unwrap(), "[10.0,null,10.2]");
    }

    #[test]
    fn test_collapse_months() {
        let mut months = MonthlyDaySeries::new();
        assert_eq!(collapse_months(months.clone()), None);

        months.insert(1, None);
        months.insert(2, None);
        assert_eq!(collapse_months(months.clone()), None);

        months.insert(3, Some(Series::new(vec![Some(1.0)])));
        assert!(collapse_months(months).is_some());
    }
}
