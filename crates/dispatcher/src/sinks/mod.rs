//! Sink implementations
//!
//! Contains TsvSink, LogSink, JsonSink and PlotSink.

mod json;
mod log;
mod plot;
mod tsv;

pub use self::json::JsonSink;
pub use self::log::LogSink;
pub use self::plot::{render_axis, PlotSink, PlotSinkConfig};
pub use self::tsv::{format_table, TsvSink, TsvSinkConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `bytes` to a temporary sibling, then rename it over `path`.
///
/// A failed write leaves any previous file at `path` untouched.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_sibling(path);
    let result = write_then_rename(&tmp, path, bytes);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(tmp, path)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!temp_sibling(&path).exists());
    }

    #[test]
    fn write_atomic_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        // A regular file cannot act as a parent directory
        let path = blocker.join("out.txt");
        assert!(write_atomic(&path, b"data").is_err());
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
    }
}
