//! History-sync persistence: one pretty-printed JSON file per blob.

use meow_core::error::MeowError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

/// Writes history-sync blobs under the data directory.
pub struct HistorySyncWriter {
    dir: PathBuf,
    /// Unix timestamp of process start, shared by every file name.
    startup: i64,
    seq: AtomicU32,
}

impl HistorySyncWriter {
    pub fn new(dir: impl Into<PathBuf>, startup: i64) -> Self {
        Self {
            dir: dir.into(),
            startup,
            seq: AtomicU32::new(0),
        }
    }

    /// Persist one blob. Returns the file written.
    pub fn write(&self, blob: &serde_json::Value) -> Result<PathBuf, MeowError> {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self
            .dir
            .join(format!("history-{}-{seq}.json", self.startup));
        std::fs::create_dir_all(&self.dir)?;
        let body = serde_json::to_vec_pretty(blob)?;
        write_private(&path, &body)?;
        Ok(path)
    }
}

#[cfg(unix)]
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(body)
}

#[cfg(not(unix))]
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_files_are_numbered_per_process() {
        let dir = tempfile::tempdir().unwrap();
        let writer = HistorySyncWriter::new(dir.path(), 1700000000);

        let first = writer.write(&json!({"conversations": []})).unwrap();
        let second = writer.write(&json!({"conversations": [1]})).unwrap();

        assert_eq!(first.file_name().unwrap(), "history-1700000000-1.json");
        assert_eq!(second.file_name().unwrap(), "history-1700000000-2.json");

        let back: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&second).unwrap()).unwrap();
        assert_eq!(back, json!({"conversations": [1]}));
    }

    #[cfg(unix)]
    #[test]
    fn test_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let writer = HistorySyncWriter::new(dir.path(), 1);
        let path = writer.write(&json!({})).unwrap();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let writer = HistorySyncWriter::new(&blocker, 1);
        assert!(writer.write(&json!({})).is_err());
    }
}
