use crate::models::{
    DailyStats, DailyWbgt, HourlyReading, MonthDay, MonthlyYearlyWbgt, StationReadings,
};
use crate::utils::constants::WBGT_DECIMALS;
use crate::utils::rounding::round_half_even;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// WBGT climatology of one station
#[derive(Debug, Clone, PartialEq)]
pub struct WbgtClimatology {
    pub station_id: String,
    pub daily: DailyWbgt,
    pub monthly_yearly: MonthlyYearlyWbgt,
}

#[derive(Debug, Clone, Copy)]
struct DateExtremes {
    min: f64,
    max: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DailyAccumulator {
    min: MeanAccumulator,
    max: MeanAccumulator,
    value: MeanAccumulator,
}

/// Reduces hourly readings to daily, monthly and whole-period statistics,
/// rounded half-to-even
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    decimals: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            decimals: WBGT_DECIMALS,
        }
    }

    /// `None` when the station has no readings at all
    pub fn aggregate(&self, station: &StationReadings) -> Option<WbgtClimatology> {
        let monthly_yearly = self.monthly_yearly(&station.readings)?;

        Some(WbgtClimatology {
            station_id: station.station_id.clone(),
            daily: self.daily(&station.readings),
            monthly_yearly,
        })
    }

    /// Min and max of each observed calendar date
    fn date_extremes(readings: &[HourlyReading]) -> HashMap<NaiveDate, DateExtremes> {
        let mut extremes: HashMap<NaiveDate, DateExtremes> = HashMap::new();
        for reading in readings {
            extremes
                .entry(reading.date)
                .and_modify(|e| {
                    e.min = e.min.min(reading.value);
                    e.max = e.max.max(reading.value);
                })
                .or_insert(DateExtremes {
                    min: reading.value,
                    max: reading.value,
                });
        }
        extremes
    }

    /// Day-of-year climatology. Every reading contributes its own value and
    /// its date's min and max, so a date's extremes weigh in proportion to
    /// how many readings that date has.
    pub fn daily(&self, readings: &[HourlyReading]) -> DailyWbgt {
        let extremes = Self::date_extremes(readings);
        let mut by_day: BTreeMap<MonthDay, DailyAccumulator> = BTreeMap::new();

        for reading in readings {
            let Some(date_extremes) = extremes.get(&reading.date) else {
                continue;
            };
            let acc = by_day
                .entry(MonthDay::new(reading.date.month(), reading.date.day()))
                .or_default();
            acc.min.push(date_extremes.min);
            acc.max.push(date_extremes.max);
            acc.value.push(reading.value);
        }

        by_day
            .into_iter()
            .filter_map(|(day, acc)| {
                Some((
                    day,
                    DailyStats {
                        min: self.round(acc.min.mean()?),
                        max: self.round(acc.max.mean()?),
                        avg: self.round(acc.value.mean()?),
                    },
                ))
            })
            .collect()
    }

    /// Per-month means across all years, and the mean of everything
    pub fn monthly_yearly(&self, readings: &[HourlyReading]) -> Option<MonthlyYearlyWbgt> {
        let mut total = MeanAccumulator::default();
        let mut by_month: BTreeMap<u32, MeanAccumulator> = BTreeMap::new();

        for reading in readings {
            total.push(reading.value);
            by_month
                .entry(reading.date.month())
                .or_default()
                .push(reading.value);
        }

        let yearly = self.round(total.mean()?);
        let monthly = by_month
            .into_iter()
            .filter_map(|(month, acc)| acc.mean().map(|m| (month, self.round(m))))
            .collect();

        Some(MonthlyYearlyWbgt { yearly, monthly })
    }

    fn round(&self, value: f64) -> f64 {
        round_half_even(value, self.decimals)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
