use crate::models::ElementCode;
use crate::utils::constants::{
    DAILY_HEADER_COLUMNS, DAILY_UNITS, MONTHLY_HEADER_COLUMNS, MONTHLY_UNITS,
};
use serde::{Deserialize, Serialize};

/// Which of the two fixed normals layouts a file uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// 7 header columns, then 31 day pairs; one row per element and month
    Daily,
    /// 6 header columns, then 12 month pairs and one trailing year pair
    Monthly,
}

impl Granularity {
    pub fn header_columns(&self) -> usize {
        match self {
            Granularity::Daily => DAILY_HEADER_COLUMNS,
            Granularity::Monthly => MONTHLY_HEADER_COLUMNS,
        }
    }

    /// Number of value/flag pairs, the trailing year pair included
    pub fn unit_count(&self) -> usize {
        match self {
            Granularity::Daily => DAILY_UNITS,
            Granularity::Monthly => MONTHLY_UNITS + 1,
        }
    }

    pub fn expected_columns(&self) -> usize {
        self.header_columns() + 2 * self.unit_count()
    }
}

/// Calendar unit a value/flag pair belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CalendarUnit {
    Day(u32),
    Month(u32),
    Year,
}

/// Static decode table entry: where a calendar unit's pair sits in the row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitColumns {
    pub unit: CalendarUnit,
    pub value: usize,
    pub flag: usize,
}

const fn unit_columns(unit: CalendarUnit, header: usize, index: usize) -> UnitColumns {
    UnitColumns {
        unit,
        value: header + 2 * index,
        flag: header + 2 * index + 1,
    }
}

const fn daily_table() -> [UnitColumns; DAILY_UNITS] {
    let mut table = [unit_columns(CalendarUnit::Day(1), DAILY_HEADER_COLUMNS, 0); DAILY_UNITS];
    let mut i = 0;
    while i < DAILY_UNITS {
        table[i] = unit_columns(CalendarUnit::Day(i as u32 + 1), DAILY_HEADER_COLUMNS, i);
        i += 1;
    }
    table
}

const fn monthly_table() -> [UnitColumns; MONTHLY_UNITS + 1] {
    let year = unit_columns(CalendarUnit::Year, MONTHLY_HEADER_COLUMNS, MONTHLY_UNITS);
    let mut table = [year; MONTHLY_UNITS + 1];
    let mut i = 0;
    while i < MONTHLY_UNITS {
        table[i] = unit_columns(CalendarUnit::Month(i as u32 + 1), MONTHLY_HEADER_COLUMNS, i);
        i += 1;
    }
    table
}

pub static DAILY_DECODE_TABLE: [UnitColumns; DAILY_UNITS] = daily_table();
pub static MONTHLY_DECODE_TABLE: [UnitColumns; MONTHLY_UNITS + 1] = monthly_table();

impl Granularity {
    pub fn decode_table(&self) -> &'static [UnitColumns] {
        match self {
            Granularity::Daily => &DAILY_DECODE_TABLE,
            Granularity::Monthly => &MONTHLY_DECODE_TABLE,
        }
    }
}

/// Raw value/flag pair as read from the row, before masking.
/// A blank value cell is `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCell {
    pub unit: CalendarUnit,
    pub value: Option<f64>,
    pub flag: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub station_id: String,
    pub element: ElementCode,
    pub period_type: String,
    pub data_years: Option<u32>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// Present on daily rows only
    pub month: Option<u32>,
    pub cells: Vec<RawCell>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_widths() {
        assert_eq!(Granularity::Daily.expected_columns(), 7 + 62);
        assert_eq!(Granularity::Monthly.expected_columns(), 6 + 26);
    }

    #[test]
    fn test_daily_decode_table() {
        let table = Granularity::Daily.decode_table();
        assert_eq!(table.len(), 31);
        assert_eq!(table[0], UnitColumns { unit: CalendarUnit::Day(1), value: 7, flag: 8 });
        assert_eq!(table[30], UnitColumns { unit: CalendarUnit::Day(31), value: 67, flag: 68 });
    }

    #[test]
    fn test_monthly_decode_table_ends_with_year() {
        let table = Granularity::Monthly.decode_table();
        assert_eq!(table.len(), 13);
        assert_eq!(table[0], UnitColumns { unit: CalendarUnit::Month(1), value: 6, flag: 7 });
        assert_eq!(table[11].unit, CalendarUnit::Month(12));
        assert_eq!(table[12], UnitColumns { unit: CalendarUnit::Year, value: 30, flag: 31 });
    }
}
