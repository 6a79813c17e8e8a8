use crate::processors::Artifacts;
use crate::readers::SkippedRow;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Station directory left out of the WBGT aggregates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteStation {
    pub station_id: String,
    pub found: usize,
    pub expected: usize,
}

/// Input file that could not be read at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: String,
    pub reason: String,
}

/// Diagnostics gathered over one run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub daily_files: usize,
    pub monthly_files: usize,
    pub wbgt_stations: usize,
    pub rows_decoded: usize,
    pub hourly_readings: usize,
    pub missing_hourly_values: usize,
    pub station_rows: usize,
    pub skipped_rows: BTreeMap<&'static str, usize>,
    pub failed_files: Vec<FailedFile>,
    pub incomplete_stations: Vec<IncompleteStation>,
    /// Stations missing a name or coordinates, or left out of the index
    pub unresolved_stations: Vec<String>,
    pub artifact_stations: Vec<(&'static str, usize)>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skipped(&mut self, skipped: &[SkippedRow]) {
        for row in skipped {
            *self.skipped_rows.entry(row.kind).or_default() += 1;
        }
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped_rows.values().sum()
    }

    pub fn record_artifacts(&mut self, artifacts: &Artifacts) {
        self.artifact_stations = artifacts.station_counts().to_vec();
    }

    /// True when the run produced no diagnostics
    pub fn is_clean(&self) -> bool {
        self.skipped_rows.is_empty()
            && self.failed_files.is_empty()
            && self.incomplete_stations.is_empty()
            && self.unresolved_stations.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        let _ = writeln!(summary, "Run Summary");
        let _ = writeln!(summary, "===========");
        let _ = writeln!(summary, "Daily normals files:   {}", self.daily_files);
        let _ = writeln!(summary, "Monthly normals files: {}", self.monthly_files);
        let _ = writeln!(summary, "Rows decoded:          {}", self.rows_decoded);
        let _ = writeln!(summary, "WBGT stations scanned: {}", self.wbgt_stations);
        let _ = writeln!(summary, "Hourly readings:       {}", self.hourly_readings);
        let _ = writeln!(summary, "Missing WBGT values:   {}", self.missing_hourly_values);
        let _ = writeln!(summary, "Station index rows:    {}", self.station_rows);

        if !self.skipped_rows.is_empty() {
            let _ = writeln!(summary, "\nSkipped rows ({}):", self.total_skipped());
            for (kind, count) in &self.skipped_rows {
                let _ = writeln!(summary, "  {:<20} {}", kind, count);
            }
        }

        if !self.failed_files.is_empty() {
            let _ = writeln!(summary, "\nUnreadable files ({}):", self.failed_files.len());
            for file in self.failed_files.iter().take(10) {
                let _ = writeln!(summary, "  {}: {}", file.path, file.reason);
            }
            if self.failed_files.len() > 10 {
                let _ = writeln!(summary, "  ... and {} more", self.failed_files.len() - 10);
            }
        }

        if !self.incomplete_stations.is_empty() {
            let _ = writeln!(
                summary,
                "\nIncomplete WBGT stations ({}):",
                self.incomplete_stations.len()
            );
            for station in self.incomplete_stations.iter().take(10) {
                let _ = writeln!(
                    summary,
                    "  {}: {} of {} files",
                    station.station_id, station.found, station.expected
                );
            }
            if self.incomplete_stations.len() > 10 {
                let _ = writeln!(summary, "  ... and {} more", self.incomplete_stations.len() - 10);
            }
        }

        if !self.unresolved_stations.is_empty() {
            let _ = writeln!(
                summary,
                "\nUnresolved index stations: {}",
                self.unresolved_stations.join(", ")
            );
        }

        if !self.artifact_stations.is_empty() {
            let _ = writeln!(summary, "\nStations per artifact:");
            for (artifact, count) in &self.artifact_stations {
                let _ = writeln!(summary, "  {:<24} {}", artifact, count);
            }
        }

        summary
    }
}
