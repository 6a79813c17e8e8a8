pub mod constants;
pub mod coordinates;
pub mod dates;
pub mod filename;
pub mod progress;
pub mod rounding;

pub use constants::*;
pub use coordinates::{dms_to_decimal, parse_coordinate, parse_coordinate_pair};
pub use dates::{parse_date, parse_hour};
pub use filename::{matches_pattern, station_id_from_dir_name, station_id_from_file_name};
pub use progress::ProgressReporter;
pub use rounding::round_half_even;
