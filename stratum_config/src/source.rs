//! Source provenance, named source sets, and priority orders.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::StratumError;
use crate::tree::{SourceTree, into_tree};

/// Provenance of a configuration fragment.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SourceKind {
    /// Process environment and dotenv files.
    Env,
    /// YAML documents.
    Yaml,
    /// JSON documents.
    Json,
    /// TOML documents.
    Toml,
    /// XML documents.
    Xml,
    /// INI documents.
    Ini,
}

impl SourceKind {
    /// Every known source kind.
    pub const ALL: [Self; 6] = [
        Self::Env,
        Self::Yaml,
        Self::Json,
        Self::Toml,
        Self::Xml,
        Self::Ini,
    ];

    /// Lower-case name used on the command line and in priority lists.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Xml => "xml",
            Self::Ini => "ini",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = StratumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or(StratumError::UnknownSource { name })
    }
}

/// Parsed trees keyed by where they came from.
///
/// A kind with no tree behaves exactly like a kind with an empty tree when
/// merged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamedSources {
    trees: BTreeMap<SourceKind, SourceTree>,
}

impl NamedSources {
    /// Create an empty source set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trees: BTreeMap::new(),
        }
    }

    /// Record `tree` for `kind`, replacing any previous tree.
    pub fn insert(&mut self, kind: SourceKind, tree: SourceTree) {
        self.trees.insert(kind, tree);
    }

    /// Builder form of [`NamedSources::insert`] accepting any JSON value.
    ///
    /// Values that are not mappings contribute an empty tree.
    #[must_use]
    pub fn with(mut self, kind: SourceKind, value: Value) -> Self {
        self.insert(kind, into_tree(value));
        self
    }

    /// Tree recorded for `kind`, if any.
    #[must_use]
    pub fn get(&self, kind: SourceKind) -> Option<&SourceTree> {
        self.trees.get(&kind)
    }

    /// Number of recorded sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether no source has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Iterate over recorded sources in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (SourceKind, &SourceTree)> {
        self.trees.iter().map(|(kind, tree)| (*kind, tree))
    }
}

impl FromIterator<(SourceKind, SourceTree)> for NamedSources {
    fn from_iter<I: IntoIterator<Item = (SourceKind, SourceTree)>>(iter: I) -> Self {
        Self {
            trees: iter.into_iter().collect(),
        }
    }
}

/// Ordered list of source kinds, lowest priority first.
///
/// The last kind wins conflicts. The default order lets environment values
/// override YAML, then JSON, TOML, XML and finally INI.
///
/// ```rust
/// use stratum_config::{PriorityOrder, SourceKind};
///
/// let order: PriorityOrder = "json, env".parse()?;
/// assert_eq!(order.highest(), SourceKind::Env);
/// # Ok::<_, stratum_config::StratumError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SourceKind>", into = "Vec<SourceKind>")]
pub struct PriorityOrder(Vec<SourceKind>);

impl PriorityOrder {
    /// Build an order from `kinds`, lowest priority first.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::InvalidPriority`] when `kinds` is empty or
    /// names a kind twice.
    pub fn new(kinds: Vec<SourceKind>) -> Result<Self, StratumError> {
        if kinds.is_empty() {
            return Err(StratumError::InvalidPriority {
                message: "priority order must name at least one source".to_owned(),
            });
        }
        for (index, kind) in kinds.iter().enumerate() {
            if kinds.iter().skip(index + 1).any(|other| other == kind) {
                return Err(StratumError::InvalidPriority {
                    message: format!("source '{kind}' appears more than once"),
                });
            }
        }
        Ok(Self(kinds))
    }

    /// Kinds in merge order.
    #[must_use]
    pub fn as_slice(&self) -> &[SourceKind] {
        &self.0
    }

    /// Kind whose values win every conflict.
    #[must_use]
    pub fn highest(&self) -> SourceKind {
        self.0.last().copied().unwrap_or(SourceKind::Env)
    }

    /// Whether `kind` takes part in the merge at all.
    #[must_use]
    pub fn contains(&self, kind: SourceKind) -> bool {
        self.0.contains(&kind)
    }
}

impl Default for PriorityOrder {
    fn default() -> Self {
        Self(vec![
            SourceKind::Ini,
            SourceKind::Xml,
            SourceKind::Toml,
            SourceKind::Json,
            SourceKind::Yaml,
            SourceKind::Env,
        ])
    }
}

impl fmt::Display for PriorityOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, kind) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

impl FromStr for PriorityOrder {
    type Err = StratumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kinds = s
            .split(',')
            .filter(|segment| !segment.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<SourceKind>, _>>()?;
        Self::new(kinds)
    }
}

impl TryFrom<Vec<SourceKind>> for PriorityOrder {
    type Error = StratumError;

    fn try_from(kinds: Vec<SourceKind>) -> Result<Self, Self::Error> {
        Self::new(kinds)
    }
}

impl From<PriorityOrder> for Vec<SourceKind> {
    fn from(order: PriorityOrder) -> Self {
        order.0
    }
}
