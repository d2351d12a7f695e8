//! Merge strategy selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::StratumError;

/// How colliding keys are resolved when two trees are merged.
///
/// Keys present on only one side are always carried over unchanged; the
/// strategy only decides what happens when both sides define a key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum MergeStrategy {
    /// Incoming values replace base values wholesale.
    Override,
    /// Nested mappings merge recursively; sequences of mappings merge by
    /// index.
    #[default]
    #[serde(alias = "merge-deep")]
    DeepMerge,
    /// Only the top level is unioned; colliding nested mappings are
    /// replaced.
    ShallowMerge,
    /// Incoming sequences are appended to base sequences.
    ConcatArrays,
    /// Incoming sequences are placed before base sequences.
    PrependArrays,
    /// Sequences are concatenated and repeated scalars dropped.
    UniqueArrays,
}

impl MergeStrategy {
    /// Every available strategy.
    pub const ALL: [Self; 6] = [
        Self::Override,
        Self::DeepMerge,
        Self::ShallowMerge,
        Self::ConcatArrays,
        Self::PrependArrays,
        Self::UniqueArrays,
    ];

    /// Kebab-case name of the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::DeepMerge => "deep-merge",
            Self::ShallowMerge => "shallow-merge",
            Self::ConcatArrays => "concat-arrays",
            Self::PrependArrays => "prepend-arrays",
            Self::UniqueArrays => "unique-arrays",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = StratumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "merge-deep" {
            return Ok(Self::DeepMerge);
        }
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == name)
            .ok_or(StratumError::UnknownStrategy { name })
    }
}
