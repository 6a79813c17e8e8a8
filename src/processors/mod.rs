pub mod aggregator;
pub mod null_masker;
pub mod output_assembler;
pub mod parallel_processor;
pub mod run_report;
pub mod series_assembler;
pub mod station_resolver;

pub use aggregator::{Aggregator, WbgtClimatology};
pub use null_masker::NullMasker;
pub use output_assembler::{Artifacts, OutputAssembler};
pub use parallel_processor::ParallelProcessor;
pub use run_report::{FailedFile, IncompleteStation, RunReport};
pub use series_assembler::SeriesAssembler;
pub use station_resolver::{ResolvedStations, StationIndexResolver, UnresolvedStation};
