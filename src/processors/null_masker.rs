use crate::models::{NormalizedValue, RawCell, Series};
use crate::utils::constants::{REMARK_MISSING, VALUE_SCALE};

/// Applies the missing-value convention and the tenths scaling
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMasker;

impl NullMasker {
    pub fn new() -> Self {
        Self
    }

    /// Remark 0 means missing whatever the raw value says; otherwise the
    /// value is stored in tenths. A present remark over a blank value cell
    /// still has nothing to scale and stays absent.
    pub fn mask(&self, cell: &RawCell) -> NormalizedValue {
        if cell.flag == REMARK_MISSING {
            return None;
        }
        cell.value.map(|raw| raw / VALUE_SCALE)
    }

    pub fn mask_cells<'a>(&self, cells: impl IntoIterator<Item = &'a RawCell>) -> Series {
        Series::new(cells.into_iter().map(|cell| self.mask(cell)).collect())
    }

    /// Mask then apply the all-or-nothing rule
    pub fn mask_and_collapse<'a>(
        &self,
        cells: impl IntoIterator<Item = &'a RawCell>,
    ) -> Option<Series> {
        self.mask_cells(cells).collapse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CalendarUnit;

    fn cell(value: Option<f64>, flag: i32) -> RawCell {
        RawCell {
            unit: CalendarUnit::Day(1),
            value,
            flag,
        }
    }

    #[test]
    fn test_missing_flag_wins_over_value() {
        let masker = NullMasker::new();
        assert_eq!(masker.mask(&cell(Some(123.0), 0)), None);
        assert_eq!(masker.mask(&cell(Some(0.0), 0)), None);
    }

    #[test]
    fn test_present_values_are_scaled() {
        let masker = NullMasker::new();
        assert_eq!(masker.mask(&cell(Some(123.0), 8)), Some(12.3));
        assert_eq!(masker.mask(&cell(Some(-45.0), 1)), Some(-4.5));
        assert_eq!(masker.mask(&cell(Some(0.0), 5)), Some(0.0));
    }

    #[test]
    fn test_blank_value_with_present_flag() {
        assert_eq!(NullMasker::new().mask(&cell(None, 8)), None);
    }

    #[test]
    fn test_mask_and_collapse() {
        let masker = NullMasker::new();
        let missing = vec![cell(Some(1.0), 0), cell(Some(2.0), 0)];
        assert_eq!(masker.mask_and_collapse(&missing), None);

        let partial = vec![cell(Some(1.0), 0), cell(Some(20.0), 8)];
        assert_eq!(
            masker.mask_and_collapse(&partial),
            Some(Series::new(vec![None, Some(2.0)]))
        );
    }
}
