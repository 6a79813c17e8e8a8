use crate::error::Result;
use crate::processors::Artifacts;
use crate::utils::constants::{
    DAILY_NORMAL_FILE, DAILY_WBGT_FILE, MONTHLY_YEARLY_NORMAL_FILE, MONTHLY_YEARLY_WBGT_FILE,
    STATION_INDEX_FILE,
};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// One file produced by [`JsonWriter::write_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub path: PathBuf,
    pub stations: usize,
    pub bytes: u64,
}

impl WrittenArtifact {
    pub fn summary(&self) -> String {
        format!(
            "{}: {} stations, {:.1} KB",
            self.path.display(),
            self.stations,
            self.bytes as f64 / 1024.0
        )
    }
}

/// Writes artifacts as pretty-printed JSON. Each file is written to a
/// temporary sibling and renamed into place, so a reader never sees a
/// partial file.
pub struct JsonWriter {
    output_dir: PathBuf,
}

impl JsonWriter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Write all five artifacts, creating the output directory if needed
    pub fn write_all(&self, artifacts: &Artifacts) -> Result<Vec<WrittenArtifact>> {
        fs::create_dir_all(&self.output_dir)?;

        let written = vec![
            self.write_artifact(
                DAILY_NORMAL_FILE,
                &artifacts.daily_normal,
                artifacts.daily_normal.len(),
            )?,
            self.write_artifact(
                MONTHLY_YEARLY_NORMAL_FILE,
                &artifacts.monthly_yearly_normal,
                artifacts.monthly_yearly_normal.len(),
            )?,
            self.write_artifact(
                DAILY_WBGT_FILE,
                &artifacts.daily_wbgt,
                artifacts.daily_wbgt.len(),
            )?,
            self.write_artifact(
                MONTHLY_YEARLY_WBGT_FILE,
                &artifacts.monthly_yearly_wbgt,
                artifacts.monthly_yearly_wbgt.len(),
            )?,
            self.write_artifact(
                STATION_INDEX_FILE,
                &artifacts.station_index,
                artifacts.station_index.len(),
            )?,
        ];

        Ok(written)
    }

    /// Serialize `value` to `file_name` inside the output directory
    pub fn write_artifact<T: Serialize + ?Sized>(
        &self,
        file_name: &str,
        value: &T,
        stations: usize,
    ) -> Result<WrittenArtifact> {
        let path = self.output_dir.join(file_name);
        let temp = NamedTempFile::new_in(&self.output_dir)?;

        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&path)?;

        let bytes = fs::metadata(&path)?.len();
        info!("Wrote {} ({} stations)", path.display(), stations);

        Ok(WrittenArtifact {
            path,
            stations,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationRecord;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn artifacts() -> Artifacts {
        let mut artifacts = Artifacts::default();
        artifacts.station_index.insert(
            "47401".to_string(),
            StationRecord {
                station_id: "47401".to_string(),
                station_name: Some("Wakkanai".to_string()),
                latitude: Some(45.415),
                longitude: Some(141.678),
                ..StationRecord::default()
            },
        );
        artifacts
    }

    #[test]
    fn test_write_all_creates_five_files() -> Result<()> {
        let dir = TempDir::new()?;
        let out = dir.path().join("processed");
        let writer = JsonWriter::new(&out);

        let written = writer.write_all(&artifacts())?;

        assert_eq!(written.len(), 5);
        for file in &written {
            assert!(file.path.is_file());
        }
        assert_eq!(fs::read_to_string(out.join(DAILY_WBGT_FILE))?, "{}\n");

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(STATION_INDEX_FILE))?)?;
        assert_eq!(index["47401"]["station_name"], "Wakkanai");
        assert!(index["47401"].get("station_id").is_none());
        assert_eq!(index["47401"]["altitude"], serde_json::Value::Null);
        Ok(())
    }

    #[test]
    fn test_output_is_indented_with_two_spaces() -> Result<()> {
        let dir = TempDir::new()?;
        let writer = JsonWriter::new(dir.path());

        let mut map = BTreeMap::new();
        map.insert("47401", 1);
        writer.write_artifact("x.json", &map, 1)?;

        assert_eq!(
            fs::read_to_string(dir.path().join("x.json"))?,
            "{\n  \"47401\": 1\n}\n"
        );
        Ok(())
    }

    #[test]
    fn test_rewrite_replaces_previous_file() -> Result<()> {
        let dir = TempDir::new()?;
        let writer = JsonWriter::new(dir.path());

        writer.write_artifact("x.json", &vec![1, 2, 3], 3)?;
        writer.write_artifact("x.json", &Vec::<u32>::new(), 0)?;

        assert_eq!(fs::read_to_string(dir.path().join("x.json"))?, "[]\n");
        // no temporary files left behind
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }
}
