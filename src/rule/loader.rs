use super::graph::RuleGraph;
use crate::error::FileError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

impl RuleGraph {
    /// Load a rule graph from a JSON file.
    ///
    /// A missing file surfaces as `FileError::NotFound`; every other read
    /// failure keeps its own variant so callers can tell the two apart.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => FileError::NotFound(path.to_path_buf()),
            _ => FileError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        })?;

        serde_json::from_str(&content).map_err(|err| FileError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    }
}

/// Derive a display name from a rule filepath: the final path segment with
/// its `.json` extension removed.
pub fn derive_name_from_filepath(filepath: &str) -> String {
    filepath
        .rsplit('/')
        .next()
        .unwrap_or(filepath)
        .trim_end_matches(".json")
        .to_string()
}
