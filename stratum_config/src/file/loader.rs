//! Loading entrypoints shared by every file-backed source.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

use crate::StratumResult;
use crate::error::file_error;
use crate::tree::SourceTree;

use super::FileFormat;
use super::helpers::read_utf8;
use super::parser::parse_document;

/// Produces the tree for one source kind from a list of paths.
///
/// Loaders never fail: unreadable or malformed inputs are logged and
/// skipped, so a broken file degrades to an empty contribution. Closures of
/// the right shape implement the trait, which makes ad hoc loaders easy to
/// register.
///
/// ```rust
/// use camino::Utf8PathBuf;
/// use serde_json::json;
/// use stratum_config::{SourceLoader, SourceTree};
///
/// let fixed = |_: &[Utf8PathBuf]| -> SourceTree {
///     json!({"from": "memory"}).as_object().cloned().unwrap_or_default()
/// };
/// assert_eq!(fixed.load(&[]).get("from"), Some(&json!("memory")));
/// ```
pub trait SourceLoader: Send + Sync {
    /// Read every path in order and combine the results.
    fn load(&self, paths: &[Utf8PathBuf]) -> SourceTree;
}

impl<F> SourceLoader for F
where
    F: Fn(&[Utf8PathBuf]) -> SourceTree + Send + Sync,
{
    fn load(&self, paths: &[Utf8PathBuf]) -> SourceTree {
        self(paths)
    }
}

/// Read and parse a single document.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns a [`crate::StratumError::File`] if reading or parsing the file
/// fails.
pub fn load_document(path: &Utf8Path, format: FileFormat) -> StratumResult<Option<SourceTree>> {
    let data = match read_utf8(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(file_error(path.as_std_path(), err)),
    };
    parse_document(path, &data, format).map(Some)
}

/// Loader for one document format.
///
/// Later paths override earlier ones at the top level. INI sections are the
/// exception: a section repeated across files is unioned key by key, with
/// the later file winning each key.
///
/// ```rust,no_run
/// use camino::Utf8PathBuf;
/// use stratum_config::{FileFormat, FileLoader, SourceLoader};
///
/// let loader = FileLoader::new(FileFormat::Yaml);
/// let tree = loader.load(&[Utf8PathBuf::from("config.yaml"), Utf8PathBuf::from("config.yml")]);
/// println!("{} top-level keys", tree.len());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FileLoader {
    format: FileFormat,
}

impl FileLoader {
    /// Loader reading `format` documents.
    #[must_use]
    pub const fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Format this loader reads.
    #[must_use]
    pub const fn format(&self) -> FileFormat {
        self.format
    }

    fn overlay(self, merged: &mut SourceTree, tree: SourceTree) {
        let sections = self.format == FileFormat::Ini;
        for (key, incoming) in tree {
            let value = match (merged.get_mut(&key), incoming) {
                (Some(Value::Object(existing)), Value::Object(section)) if sections => {
                    existing.extend(section);
                    continue;
                }
                (_, value) => value,
            };
            merged.insert(key, value);
        }
    }
}

impl SourceLoader for FileLoader {
    fn load(&self, paths: &[Utf8PathBuf]) -> SourceTree {
        let mut merged = SourceTree::new();
        for path in paths {
            match load_document(path, self.format) {
                Ok(Some(tree)) => {
                    tracing::debug!(%path, format = %self.format, keys = tree.len(), "loaded configuration file");
                    self.overlay(&mut merged, tree);
                }
                Ok(None) => {
                    tracing::debug!(%path, format = %self.format, "configuration file not found; skipping");
                }
                Err(err) => {
                    tracing::warn!(%path, format = %self.format, error = %err, "skipping unreadable configuration file");
                }
            }
        }
        merged
    }
}
