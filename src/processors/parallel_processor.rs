use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::Granularity;
use crate::processors::{
    Aggregator, Artifacts, FailedFile, IncompleteStation, OutputAssembler, ResolvedStations,
    RunReport, SeriesAssembler, StationIndexResolver, WbgtClimatology,
};
use crate::readers::{HourlyReader, SkippedRow, StationReader, StationScan, WideRowDecoder};
use crate::utils::constants::CSV_EXTENSION;
use crate::utils::filename::{matches_pattern, station_id_from_dir_name, station_id_from_file_name};
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Per-file result of a normals pass, merged after the parallel section
struct NormalsOutcome<T> {
    station_id: String,
    rows: usize,
    skipped: Vec<SkippedRow>,
    normal: T,
}

/// Per-directory result of the WBGT pass
enum WbgtOutcome {
    Aggregated {
        climatology: Option<WbgtClimatology>,
        readings: usize,
        missing_values: usize,
        skipped: Vec<SkippedRow>,
    },
    Incomplete(IncompleteStation),
}

/// Runs every stage of the pipeline. Stations are processed independently on
/// a rayon pool and merged in station order, so the output does not depend
/// on the worker count.
pub struct ParallelProcessor {
    config: PipelineConfig,
    station_filter: Option<String>,
    show_progress: bool,
}

impl ParallelProcessor {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            station_filter: None,
            show_progress: false,
        }
    }

    /// Restrict the normals and WBGT passes to one station
    pub fn with_station_filter(mut self, station_id: Option<String>) -> Self {
        self.station_filter = station_id;
        self
    }

    /// Draw one progress bar per pass, sized to the files or stations it reads
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Build all five artifacts in memory
    pub fn process_all_data(&self) -> Result<(Artifacts, RunReport)> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let mut assembler = OutputAssembler::new();
        let mut report = RunReport::new();

        pool.install(|| -> Result<()> {
            self.process_daily_normals(&mut assembler, &mut report)?;
            self.process_monthly_normals(&mut assembler, &mut report)?;
            self.process_wbgt(&mut assembler, &mut report)?;
            Ok(())
        })?;

        let progress =
            ProgressReporter::new_spinner("Resolving station index...", !self.show_progress);
        let resolved = self.resolve_station_index(&mut report)?;
        progress.finish_with_message(&format!("Resolved {} stations", resolved.records.len()));
        assembler.set_station_index(resolved.records);

        let artifacts = assembler.finish();
        report.record_artifacts(&artifacts);

        Ok((artifacts, report))
    }

    /// Read and resolve the station metadata table
    pub fn resolve_station_index(&self, report: &mut RunReport) -> Result<ResolvedStations> {
        let path = &self.config.station_index_file;
        if !path.is_file() {
            return Err(ProcessingError::Config(format!(
                "Station index file not found: {}",
                path.display()
            )));
        }

        let table = StationReader::new(self.config.station_index.clone()).read_stations(path)?;
        report.station_rows = table.rows.len();
        report.record_skipped(&table.skipped);
        if !table.skipped.is_empty() {
            warn!(
                "{}: skipped {} malformed rows",
                path.display(),
                table.skipped.len()
            );
        }

        let resolved = StationIndexResolver::new().resolve(&table.rows);
        report.unresolved_stations = resolved
            .unresolved
            .iter()
            .map(|s| s.station_id.clone())
            .collect();

        info!("Resolved {} stations from the station index", resolved.records.len());
        Ok(resolved)
    }

    fn process_daily_normals(
        &self,
        assembler: &mut OutputAssembler,
        report: &mut RunReport,
    ) -> Result<()> {
        let series = SeriesAssembler::new();
        let files =
            self.normals_files(&self.config.daily_normals_dir(), &self.config.daily_prefix)?;
        report.daily_files = files.len();

        let outcomes = self.decode_normals(&files, Granularity::Daily, "daily normals", |rows| {
            series.assemble_daily(rows)
        });

        self.merge_normals(outcomes, report, |station_id, normal| {
            assembler.add_daily_normal(station_id, normal)
        });
        Ok(())
    }

    fn process_monthly_normals(
        &self,
        assembler: &mut OutputAssembler,
        report: &mut RunReport,
    ) -> Result<()> {
        let series = SeriesAssembler::new().with_monthly_units(self.config.monthly_units);
        let files =
            self.normals_files(&self.config.monthly_normals_dir(), &self.config.monthly_prefix)?;
        report.monthly_files = files.len();

        let outcomes = self.decode_normals(&files, Granularity::Monthly, "monthly normals", |rows| {
            series.assemble_monthly(rows)
        });

        self.merge_normals(outcomes, report, |station_id, normal| {
            assembler.add_monthly_yearly_normal(station_id, normal)
        });
        Ok(())
    }

    /// Decode and assemble every file in parallel, keeping file order
    fn decode_normals<T, F>(
        &self,
        files: &[PathBuf],
        granularity: Granularity,
        label: &str,
        assemble: F,
    ) -> Vec<(PathBuf, Result<NormalsOutcome<T>>)>
    where
        T: Send,
        F: Fn(&[crate::models::WideRow]) -> T + Sync,
    {
        let progress = ProgressReporter::new(
            files.len() as u64,
            &format!("Reading {} files...", label),
            !self.show_progress,
        );
        let decoder = WideRowDecoder::new(granularity);

        let outcomes: Vec<_> = files
            .par_iter()
            .map(|path| {
                let outcome = decoder.read_file(path).map(|decoded| NormalsOutcome {
                    normal: assemble(&decoded.rows),
                    rows: decoded.rows.len(),
                    station_id: decoded.station_id,
                    skipped: decoded.skipped,
                });

                progress.increment(1);
                (path.clone(), outcome)
            })
            .collect();

        progress.finish_with_message(&format!("Read {} {} files", files.len(), label));
        outcomes
    }

    fn merge_normals<T>(
        &self,
        outcomes: Vec<(PathBuf, Result<NormalsOutcome<T>>)>,
        report: &mut RunReport,
        mut add: impl FnMut(&str, T) -> bool,
    ) {
        for (path, outcome) in outcomes {
            match outcome {
                Ok(outcome) => {
                    report.rows_decoded += outcome.rows;
                    report.record_skipped(&outcome.skipped);
                    if !outcome.skipped.is_empty() {
                        warn!(
                            "{}: skipped {} malformed rows",
                            path.display(),
                            outcome.skipped.len()
                        );
                    }
                    if add(&outcome.station_id, outcome.normal) {
                        info!("Loaded station {} from {}", outcome.station_id, path.display());
                    }
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report.failed_files.push(FailedFile {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    fn process_wbgt(
        &self,
        assembler: &mut OutputAssembler,
        report: &mut RunReport,
    ) -> Result<()> {
        let base_dir = &self.config.wbgt_dir;
        if !base_dir.is_dir() {
            return Err(ProcessingError::Config(format!(
                "WBGT directory not found: {}",
                base_dir.display()
            )));
        }

        let dirs: Vec<PathBuf> = HourlyReader::station_dirs(base_dir)?
            .into_iter()
            .filter(|dir| self.wanted(station_id_from_dir_name(dir).ok().as_deref()))
            .collect();
        report.wbgt_stations = dirs.len();

        let progress = ProgressReporter::new(
            dirs.len() as u64,
            "Aggregating WBGT stations...",
            !self.show_progress,
        );
        let reader =
            HourlyReader::new(&self.config.hourly_prefix, self.config.expected_hourly_files);
        let aggregator = Aggregator::new();

        let outcomes: Vec<(PathBuf, Result<WbgtOutcome>)> = dirs
            .par_iter()
            .map(|dir| {
                let outcome = reader.read_station(dir).map(|scan| match scan {
                    StationScan::Complete {
                        readings,
                        skipped,
                        missing_values,
                    } => WbgtOutcome::Aggregated {
                        climatology: aggregator.aggregate(&readings),
                        readings: readings.readings.len(),
                        missing_values,
                        skipped,
                    },
                    StationScan::Incomplete {
                        station_id,
                        found,
                        expected,
                    } => WbgtOutcome::Incomplete(IncompleteStation {
                        station_id,
                        found,
                        expected,
                    }),
                });

                progress.increment(1);
                (dir.clone(), outcome)
            })
            .collect();
        progress.finish_with_message(&format!("Aggregated {} WBGT stations", dirs.len()));

        for (dir, outcome) in outcomes {
            match outcome {
                Ok(WbgtOutcome::Aggregated {
                    climatology,
                    readings,
                    missing_values,
                    skipped,
                }) => {
                    report.hourly_readings += readings;
                    report.missing_hourly_values += missing_values;
                    report.record_skipped(&skipped);
                    match climatology {
                        Some(climatology) => {
                            let station_id = climatology.station_id.clone();
                            if assembler.add_wbgt(climatology) {
                                info!("Loaded WBGT for station {}", station_id);
                            }
                        }
                        None => warn!("{}: no WBGT readings, station left out", dir.display()),
                    }
                }
                Ok(WbgtOutcome::Incomplete(station)) => {
                    warn!(
                        "Station {}: {} of {} hourly files, excluded from WBGT aggregates",
                        station.station_id, station.found, station.expected
                    );
                    report.incomplete_stations.push(station);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", dir.display(), e);
                    report.failed_files.push(FailedFile {
                        path: dir.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Normals files with the given prefix, sorted by name
    fn normals_files(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(ProcessingError::Config(format!(
                "Normals directory not found: {}",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || !matches_pattern(&path, prefix, CSV_EXTENSION) {
                continue;
            }
            if self.wanted(station_id_from_file_name(&path).ok().as_deref()) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn wanted(&self, station_id: Option<&str>) -> bool {
        match (&self.station_filter, station_id) {
            (None, _) => true,
            (Some(wanted), Some(id)) => wanted == id,
            (Some(_), None) => false,
        }
    }
}
