use crate::cli::args::{Cli, Commands, InputArgs};
use crate::config::PipelineConfig;
use crate::processors::{ParallelProcessor, RunReport};
use crate::writers::JsonWriter;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

pub fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli)?;

    let mut config = PipelineConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Build {
            input,
            output_dir,
            station,
            dry_run,
        } => {
            apply_input_overrides(&mut config, &input);
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            config.check().context("Invalid configuration")?;

            let report = build(config, station, dry_run, cli.quiet)?;
            println!("\n{}", report.summary());
        }

        Commands::Validate { input } => {
            apply_input_overrides(&mut config, &input);
            config.check().context("Invalid configuration")?;

            let report = build(config, None, true, cli.quiet)?;
            println!("\n{}", report.summary());

            if report.is_clean() {
                println!("All inputs passed validation checks");
            } else {
                println!(
                    "Found {} skipped rows, {} unreadable files, {} incomplete stations, \
                     {} unresolved stations",
                    report.total_skipped(),
                    report.failed_files.len(),
                    report.incomplete_stations.len(),
                    report.unresolved_stations.len()
                );
            }
        }

        Commands::Stations {
            station_index,
            station,
        } => {
            if let Some(path) = station_index {
                config.station_index_file = path;
            }
            config.check().context("Invalid configuration")?;

            let processor = ParallelProcessor::new(config);
            let mut report = RunReport::new();
            let resolved = processor
                .resolve_station_index(&mut report)
                .context("Failed to resolve the station index")?;

            let records: BTreeMap<_, _> = resolved
                .records
                .into_iter()
                .filter(|(id, _)| station.as_ref().map_or(true, |wanted| wanted == id))
                .collect();

            println!("{}", serde_json::to_string_pretty(&records)?);
            for station in &resolved.unresolved {
                eprintln!("unresolved {}: {}", station.station_id, station.reason);
            }
        }
    }

    Ok(())
}

fn build(
    config: PipelineConfig,
    station: Option<String>,
    dry_run: bool,
    quiet: bool,
) -> Result<RunReport> {
    info!("Normals directory: {}", config.normals_dir.display());
    info!("WBGT directory: {}", config.wbgt_dir.display());
    info!("Station index: {}", config.station_index_file.display());
    info!("Workers: {}", config.max_workers);

    let output_dir: PathBuf = config.output_dir.clone();

    let processor = ParallelProcessor::new(config)
        .with_station_filter(station)
        .with_progress(!quiet);
    let (artifacts, report) = processor.process_all_data().context("Pipeline failed")?;

    if dry_run {
        println!("Dry run complete - no output files written");
        return Ok(report);
    }

    let writer = JsonWriter::new(&output_dir);
    let written = writer
        .write_all(&artifacts)
        .with_context(|| format!("Failed to write output to {}", output_dir.display()))?;

    println!("\nOutput files:");
    for file in &written {
        println!("  {}", file.summary());
    }

    Ok(report)
}

fn apply_input_overrides(config: &mut PipelineConfig, input: &InputArgs) {
    if let Some(dir) = &input.normals_dir {
        config.normals_dir = dir.clone();
    }
    if let Some(dir) = &input.wbgt_dir {
        config.wbgt_dir = dir.clone();
    }
    if let Some(path) = &input.station_index {
        config.station_index_file = path.clone();
    }
    if let Some(workers) = input.max_workers {
        config.max_workers = workers;
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = cli.log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("amedas_processor={}", log_level)));

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_level(true)
                        .with_timer(fmt::time::uptime())
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_overrides() {
        let mut config = PipelineConfig::default();
        let input = InputArgs {
            wbgt_dir: Some(PathBuf::from("/tmp/wbgt")),
            max_workers: Some(3),
            ..InputArgs::default()
        };

        apply_input_overrides(&mut config, &input);

        assert_eq!(config.wbgt_dir, PathBuf::from("/tmp/wbgt"));
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.normals_dir, PipelineConfig::default().normals_dir);
    }
}
