//! Environment variable source backed by figment's `Env` provider.

mod dotenv;

use camino::Utf8PathBuf;
use figment::providers::Env;
use serde_json::{Map, Value};

use crate::file::{SourceLoader, read_utf8};
use crate::tree::SourceTree;

use self::dotenv::parse_dotenv;

const NESTING_SEPARATOR: &str = "__";

/// Loader for the `env` source.
///
/// The paths passed to [`SourceLoader::load`] are dotenv files. Their
/// assignments are read in order, later files winning, and a snapshot of
/// the process environment is laid over the result so exported variables
/// always beat file values. The process environment is never modified.
///
/// Keys keep their case. With a prefix, only matching variables are kept
/// and the prefix is stripped. With nesting enabled, `__` separates path
/// segments, so `SERVER__PORT` becomes `{"SERVER": {"PORT": "…"}}`. All
/// values are strings.
///
/// ```rust,no_run
/// use camino::Utf8PathBuf;
/// use stratum_config::{EnvLoader, SourceLoader};
///
/// let loader = EnvLoader::new().prefixed("APP_").nested(true);
/// let tree = loader.load(&[Utf8PathBuf::from(".env")]);
/// println!("{:?}", tree.get("SERVER"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnvLoader {
    prefix: Option<String>,
    nested: bool,
    process: bool,
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self {
            prefix: None,
            nested: false,
            process: true,
        }
    }
}

impl EnvLoader {
    /// Loader reading every process variable and the given dotenv files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only variables starting with `prefix`, compared without regard
    /// to case, and strip it from the key.
    #[must_use]
    pub fn prefixed(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into()).filter(|prefix| !prefix.is_empty());
        self
    }

    /// Split keys on `__` into nested trees.
    #[must_use]
    pub const fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// Read dotenv files only, ignoring the process environment.
    #[must_use]
    pub const fn without_process_env(mut self) -> Self {
        self.process = false;
        self
    }

    /// Prefix filter, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn provider(&self) -> Env {
        let env = self
            .prefix
            .as_deref()
            .map_or_else(Env::raw, Env::prefixed)
            .lowercase(false);
        if self.nested {
            env.split(NESTING_SEPARATOR)
        } else {
            env
        }
    }

    /// Apply the prefix filter and nesting separator to a dotenv key, the
    /// way the `Env` provider does for process variables.
    fn map_file_key(&self, key: &str) -> Option<String> {
        let stripped = match self.prefix.as_deref() {
            Some(prefix) => {
                let head = key.get(..prefix.len())?;
                if !head.eq_ignore_ascii_case(prefix) {
                    return None;
                }
                key.get(prefix.len()..)?
            }
            None => key,
        };
        if stripped.is_empty() {
            return None;
        }
        Some(if self.nested {
            stripped.replace(NESTING_SEPARATOR, ".")
        } else {
            stripped.to_owned()
        })
    }

    fn insert(&self, tree: &mut SourceTree, key: &str, value: String) {
        if self.nested {
            insert_nested(tree, key, value);
        } else {
            tree.insert(key.to_owned(), Value::String(value));
        }
    }

    fn load_dotenv(&self, tree: &mut SourceTree, path: &Utf8PathBuf) {
        let data = match read_utf8(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(%path, "dotenv file not found; skipping");
                return;
            }
            Err(err) => {
                tracing::warn!(%path, error = %err, "skipping unreadable dotenv file");
                return;
            }
        };
        let pairs = parse_dotenv(path, &data);
        tracing::debug!(%path, variables = pairs.len(), "loaded dotenv file");
        for (name, value) in pairs {
            if let Some(key) = self.map_file_key(&name) {
                self.insert(tree, &key, value);
            }
        }
    }
}

/// Insert `value` at the dotted `key`, replacing scalars that stand in the
/// way of the path.
fn insert_nested(tree: &mut SourceTree, key: &str, value: String) {
    let mut segments: Vec<&str> = key.split('.').filter(|segment| !segment.is_empty()).collect();
    let Some(last) = segments.pop() else {
        return;
    };
    let mut current = tree;
    for segment in segments {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.to_owned(), Value::String(value));
}

impl SourceLoader for EnvLoader {
    fn load(&self, paths: &[Utf8PathBuf]) -> SourceTree {
        let mut tree = SourceTree::new();
        for path in paths {
            self.load_dotenv(&mut tree, path);
        }

        if self.process {
            let mut vars: Vec<(String, String)> = self
                .provider()
                .iter()
                .map(|(key, value)| (key.as_str().to_owned(), value))
                .collect();
            vars.sort_by(|(left, _), (right, _)| left.cmp(right));
            tracing::trace!(count = vars.len(), "captured process environment");
            for (key, value) in vars {
                self.insert(&mut tree, &key, value);
            }
        }
        tree
    }
}
