use crate::models::{
    collapse_months, CalendarUnit, DailyNormal, ElementCode, MonthlyDaySeries,
    MonthlyYearlyNormal, PerElement, WideRow,
};
use crate::processors::NullMasker;
use crate::utils::constants::MONTHLY_UNITS;
use std::collections::btree_map::Entry;
use tracing::debug;

/// Turns one station's decoded rows into per-element series
#[derive(Debug, Clone, Copy)]
pub struct SeriesAssembler {
    masker: NullMasker,
    monthly_units: usize,
}

impl SeriesAssembler {
    pub fn new() -> Self {
        Self {
            masker: NullMasker::new(),
            monthly_units: MONTHLY_UNITS,
        }
    }

    /// Keep only the first `monthly_units` months in monthly series
    pub fn with_monthly_units(mut self, monthly_units: usize) -> Self {
        self.monthly_units = monthly_units.clamp(1, MONTHLY_UNITS);
        self
    }

    /// Daily table rows -> month-keyed day series per element. Each month's
    /// series collapses on its own, then each element collapses when no
    /// month survived.
    pub fn assemble_daily(&self, rows: &[WideRow]) -> DailyNormal {
        let mut by_element: PerElement<MonthlyDaySeries> = PerElement::default();

        for row in rows {
            let Some(month) = row.month else {
                debug!("Daily row for {} without a month, ignored", row.element);
                continue;
            };

            match by_element.get_mut(row.element).entry(month) {
                Entry::Vacant(slot) => {
                    slot.insert(self.masker.mask_and_collapse(&row.cells));
                }
                Entry::Occupied(_) => {
                    debug!(
                        "Station {}: duplicate {} row for month {}, keeping the first",
                        row.station_id, row.element, month
                    );
                }
            }
        }

        PerElement::from_fn(|element| {
            collapse_months(std::mem::take(by_element.get_mut(element)))
        })
    }

    /// Monthly table rows -> 12-month series and annual value per element.
    /// Elements without a row are absent in both.
    pub fn assemble_monthly(&self, rows: &[WideRow]) -> MonthlyYearlyNormal {
        let mut normal = MonthlyYearlyNormal::default();
        let mut seen: PerElement<bool> = PerElement::default();

        for row in rows {
            if std::mem::replace(seen.get_mut(row.element), true) {
                debug!(
                    "Station {}: duplicate {} row, keeping the first",
                    row.station_id, row.element
                );
                continue;
            }

            let months = row
                .cells
                .iter()
                .filter(|cell| matches!(cell.unit, CalendarUnit::Month(_)))
                .take(self.monthly_units);
            *normal.monthly.get_mut(row.element) = self.masker.mask_and_collapse(months);

            *normal.yearly.get_mut(row.element) = row
                .cells
                .iter()
                .find(|cell| cell.unit == CalendarUnit::Year)
                .and_then(|cell| self.masker.mask(cell));
        }

        normal
    }
}

impl Default for SeriesAssembler {
    fn default() -> Self {
        Self::new()
    }
}
