//! Deployment environment detection and environment-specific file lists.

use std::fmt;
use std::sync::OnceLock;

use camino::Utf8PathBuf;
use figment::providers::Env;

use crate::SourceKind;

/// Name of a deployment environment such as `production` or `staging`.
///
/// ```rust
/// use stratum_config::EnvironmentName;
///
/// let env = EnvironmentName::new(" prod ");
/// assert_eq!(env.as_str(), "prod");
/// assert!(env.is_production());
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    /// Name used when nothing else is configured.
    pub const DEFAULT: &'static str = "development";

    /// Wrap `name`, trimming surrounding whitespace.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_owned())
    }

    /// The name as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `production` or `prod`.
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self.0.as_str(), "production" | "prod")
    }

    /// `development` or `dev`.
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self.0.as_str(), "development" | "dev")
    }

    /// `test` or `testing`.
    #[must_use]
    pub fn is_testing(&self) -> bool {
        matches!(self.0.as_str(), "test" | "testing")
    }
}

impl Default for EnvironmentName {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EnvironmentName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for EnvironmentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Works out which environment the process runs in.
///
/// The first variable in the list with a non-blank value names the
/// environment; otherwise the fallback applies. The answer is cached on the
/// detector itself, so independent detectors never share state and
/// [`EnvironmentDetector::reset`] forces a fresh look.
///
/// ```rust
/// use stratum_config::EnvironmentDetector;
///
/// let detector = EnvironmentDetector::new()
///     .with_variables(["STRATUM_DOCTEST_UNSET_ENV"])
///     .with_fallback("staging");
/// assert_eq!(detector.detect().as_str(), "staging");
/// ```
#[derive(Debug)]
pub struct EnvironmentDetector {
    variables: Vec<String>,
    fallback: EnvironmentName,
    detected: OnceLock<EnvironmentName>,
}

impl Default for EnvironmentDetector {
    fn default() -> Self {
        Self {
            variables: Self::DEFAULT_VARIABLES.iter().map(|&name| name.to_owned()).collect(),
            fallback: EnvironmentName::default(),
            detected: OnceLock::new(),
        }
    }
}

impl EnvironmentDetector {
    /// Variables consulted by default, most specific first.
    pub const DEFAULT_VARIABLES: [&'static str; 3] = ["STRATUM_ENV", "ENVIRONMENT", "ENV"];

    /// Detector using [`Self::DEFAULT_VARIABLES`] and `development`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the variables consulted, in priority order.
    #[must_use]
    pub fn with_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variables = variables.into_iter().map(Into::into).collect();
        self.detected = OnceLock::new();
        self
    }

    /// Replace the environment used when no variable is set.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<EnvironmentName>) -> Self {
        self.fallback = fallback.into();
        self.detected = OnceLock::new();
        self
    }

    /// Detected environment, computed on first call and cached.
    pub fn detect(&self) -> &EnvironmentName {
        self.detected.get_or_init(|| {
            let detected = self.detect_with(Env::var);
            tracing::debug!(environment = %detected, "detected environment");
            detected
        })
    }

    /// Detect using `lookup` instead of the process environment. Nothing is
    /// cached.
    #[must_use]
    pub fn detect_with<F>(&self, lookup: F) -> EnvironmentName
    where
        F: Fn(&str) -> Option<String>,
    {
        self.variables
            .iter()
            .filter_map(|name| lookup(name))
            .map(EnvironmentName::new)
            .find(|name| !name.as_str().is_empty())
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Forget the cached environment.
    pub fn reset(&mut self) {
        self.detected.take();
    }
}

/// Candidate file paths for one environment, per source kind.
///
/// Shared files come first and environment-specific files after them, so
/// under last-wins loading the environment-specific values override the
/// shared ones.
///
/// ```rust
/// use stratum_config::{EnvironmentFiles, EnvironmentName, SourceKind};
///
/// let files = EnvironmentFiles::for_environment(&EnvironmentName::new("production"));
/// let json: Vec<&str> = files.paths(SourceKind::Json).iter().map(|p| p.as_str()).collect();
/// assert_eq!(json, vec!["config.json", "config.production.json"]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnvironmentFiles {
    environment: EnvironmentName,
    entries: Vec<(SourceKind, Vec<Utf8PathBuf>)>,
}

impl EnvironmentFiles {
    /// File lists for `environment`.
    #[must_use]
    pub fn for_environment(environment: &EnvironmentName) -> Self {
        let env = environment.as_str();
        let entries = vec![
            (
                SourceKind::Env,
                paths([
                    ".env".to_owned(),
                    ".env.local".to_owned(),
                    format!(".env.{env}"),
                    format!(".env.{env}.local"),
                ]),
            ),
            (SourceKind::Json, config_paths(env, &["json"])),
            (SourceKind::Yaml, config_paths(env, &["yaml", "yml"])),
            (SourceKind::Toml, config_paths(env, &["toml"])),
            (SourceKind::Xml, config_paths(env, &["xml"])),
            (SourceKind::Ini, config_paths(env, &["ini"])),
        ];
        Self {
            environment: environment.clone(),
            entries,
        }
    }

    /// Environment the lists were built for.
    #[must_use]
    pub const fn environment(&self) -> &EnvironmentName {
        &self.environment
    }

    /// Paths for `kind`, lowest priority first.
    #[must_use]
    pub fn paths(&self, kind: SourceKind) -> &[Utf8PathBuf] {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == kind)
            .map(|(_, paths)| paths.as_slice())
            .unwrap_or_default()
    }

    /// Every candidate path, grouped by source kind.
    pub fn candidates(&self) -> impl Iterator<Item = (SourceKind, &Utf8PathBuf)> {
        self.entries
            .iter()
            .flat_map(|(kind, paths)| paths.iter().map(move |path| (*kind, path)))
    }
}

fn paths<const N: usize>(names: [String; N]) -> Vec<Utf8PathBuf> {
    names.into_iter().map(Utf8PathBuf::from).collect()
}

/// Shared `config.<ext>` files first, then `config.<env>.<ext>` files.
fn config_paths(env: &str, extensions: &[&str]) -> Vec<Utf8PathBuf> {
    let shared = extensions.iter().map(|ext| format!("config.{ext}"));
    let specific = extensions.iter().map(|ext| format!("config.{env}.{ext}"));
    shared.chain(specific).map(Utf8PathBuf::from).collect()
}
