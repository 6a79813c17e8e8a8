use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "amedas-processor")]
#[command(about = "Builds per-station climatologies from JMA normals and MOE hourly WBGT tables")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and hide progress bars"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Input locations shared by every subcommand. Each one overrides the
/// configured value when given.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    #[arg(long, help = "Directory holding the daily/ and monthly/ normals tables")]
    pub normals_dir: Option<PathBuf>,

    #[arg(long, help = "Directory holding one subdirectory of hourly WBGT files per station")]
    pub wbgt_dir: Option<PathBuf>,

    #[arg(long, help = "Station metadata table")]
    pub station_index: Option<PathBuf>,

    #[arg(long, help = "Number of worker threads")]
    pub max_workers: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build all five JSON artifacts
    Build {
        #[command(flatten)]
        input: InputArgs,

        #[arg(short, long, help = "Output directory for the JSON files")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Only process this station id")]
        station: Option<String>,

        #[arg(long, default_value = "false", help = "Run the pipeline without writing output")]
        dry_run: bool,
    },

    /// Run the whole pipeline and report problems without writing anything
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Resolve and print the station index
    Stations {
        #[arg(long, help = "Station metadata table")]
        station_index: Option<PathBuf>,

        #[arg(short, long, help = "Only print this station id")]
        station: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_arguments() {
        let cli = Cli::parse_from([
            "amedas-processor",
            "build",
            "--wbgt-dir",
            "/data/wbgt",
            "--station",
            "47401",
            "--dry-run",
        ]);

        match cli.command {
            Commands::Build {
                input,
                station,
                dry_run,
                output_dir,
            } => {
                assert_eq!(input.wbgt_dir, Some(PathBuf::from("/data/wbgt")));
                assert_eq!(input.normals_dir, None);
                assert_eq!(station.as_deref(), Some("47401"));
                assert!(dry_run);
                assert_eq!(output_dir, None);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["amedas-processor", "validate", "--quiet"]);
        assert!(cli.quiet);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["amedas-processor", "-v", "-q", "stations"]).is_err());
    }
}
