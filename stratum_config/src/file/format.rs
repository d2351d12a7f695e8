//! Document formats understood by the file loaders.

use std::fmt;

use camino::Utf8Path;

use crate::SourceKind;

/// Syntax of a configuration document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum FileFormat {
    /// JSON documents.
    Json,
    /// YAML 1.2 documents.
    Yaml,
    /// TOML documents.
    Toml,
    /// INI documents with optional `[section]` headers.
    Ini,
    /// XML documents. No parser is bundled.
    Xml,
}

impl FileFormat {
    /// Guess the format from the extension of `path`.
    ///
    /// ```rust
    /// use camino::Utf8Path;
    /// use stratum_config::FileFormat;
    ///
    /// assert_eq!(FileFormat::from_path(Utf8Path::new("config.YML")), Some(FileFormat::Yaml));
    /// assert_eq!(FileFormat::from_path(Utf8Path::new(".env")), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let ext = path.extension()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "ini" | "cfg" => Some(Self::Ini),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// Format read for a file-backed source kind.
    ///
    /// Returns `None` for [`SourceKind::Env`], which is not a single document.
    #[must_use]
    pub const fn for_kind(kind: SourceKind) -> Option<Self> {
        match kind {
            SourceKind::Json => Some(Self::Json),
            SourceKind::Yaml => Some(Self::Yaml),
            SourceKind::Toml => Some(Self::Toml),
            SourceKind::Ini => Some(Self::Ini),
            SourceKind::Xml => Some(Self::Xml),
            SourceKind::Env => None,
        }
    }

    /// Lower-case name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Ini => "ini",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
