use crate::error::{ProcessingError, Result};
use std::path::Path;

/// Station id from a normals file name: the last `_`-delimited token of the
/// stem (e.g. `nml_amd_d_47401.csv` -> `47401`).
pub fn station_id_from_file_name(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Invalid file path: {}", path.display()))
        })?;

    match stem.rsplit('_').next() {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(ProcessingError::InvalidFormat(format!(
            "Could not extract station ID from filename: {}",
            path.display()
        ))),
    }
}

/// Station id from an hourly WBGT directory: the directory name itself
pub fn station_id_from_dir_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Invalid station directory: {}", path.display()))
        })
}

/// True when `path` is a file named `{prefix}*.{extension}`
pub fn matches_pattern(path: &Path, prefix: &str, extension: &str) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|f| f.to_str())
        .is_some_and(|f| f.starts_with(prefix));
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));

    name_ok && ext_ok
}
