//! One-call configuration assembly: load, merge by priority, validate.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::environment::{EnvironmentFiles, EnvironmentName};
use crate::file::{FileFormat, FileLoader, SourceLoader};
use crate::{
    EnvLoader, MergeStrategy, NamedSources, PriorityOrder, Schema, SourceKind, SourceTree,
    StratumError, StratumResult, merge_by_priority, validate,
};

/// Inputs for [`ConfigAssembler`].
///
/// The defaults read `.env`, `config.json`, `config.yaml` and `config.yml`,
/// `config.toml`, `config.xml` and `config.ini` from the working directory,
/// merge them under [`PriorityOrder::default`] with
/// [`MergeStrategy::DeepMerge`], and skip validation.
///
/// ```rust
/// use stratum_config::{LoadOptions, MergeStrategy, SourceKind};
///
/// let options = LoadOptions::new()
///     .with_priority("json,env".parse()?)
///     .with_strategy(MergeStrategy::ConcatArrays)
///     .with_paths(SourceKind::Json, ["base.json", "local.json"])
///     .with_base_dir("/etc/app");
/// assert_eq!(options.paths(SourceKind::Json)[1].as_str(), "/etc/app/local.json");
/// # Ok::<_, stratum_config::StratumError>(())
/// ```
#[derive(Clone, Debug)]
pub struct LoadOptions {
    paths: BTreeMap<SourceKind, Vec<Utf8PathBuf>>,
    priority: PriorityOrder,
    strategy: MergeStrategy,
    schema: Option<Schema>,
    env: EnvLoader,
    base_dir: Option<Utf8PathBuf>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        let defaults: [(SourceKind, &[&str]); 6] = [
            (SourceKind::Env, &[".env"]),
            (SourceKind::Json, &["config.json"]),
            (SourceKind::Yaml, &["config.yaml", "config.yml"]),
            (SourceKind::Toml, &["config.toml"]),
            (SourceKind::Xml, &["config.xml"]),
            (SourceKind::Ini, &["config.ini"]),
        ];
        let paths = defaults
            .into_iter()
            .map(|(kind, names)| (kind, names.iter().map(Utf8PathBuf::from).collect()))
            .collect();
        Self {
            paths,
            priority: PriorityOrder::default(),
            strategy: MergeStrategy::default(),
            schema: None,
            env: EnvLoader::default(),
            base_dir: None,
        }
    }
}

impl LoadOptions {
    /// Options with the default file names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options reading the shared and environment-specific files for
    /// `environment`, as listed by [`EnvironmentFiles`].
    #[must_use]
    pub fn for_environment(environment: &EnvironmentName) -> Self {
        let files = EnvironmentFiles::for_environment(environment);
        SourceKind::ALL.into_iter().fold(Self::default(), |options, kind| {
            options.with_paths(kind, files.paths(kind).iter().cloned())
        })
    }

    /// Replace the paths read for `kind`, lowest priority first.
    #[must_use]
    pub fn with_paths<I, P>(mut self, kind: SourceKind, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.paths
            .insert(kind, paths.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the priority order.
    #[must_use]
    pub fn with_priority(mut self, priority: PriorityOrder) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the merge strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Validate the merged tree against `schema`.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Configure the default loader for the `env` source.
    #[must_use]
    pub fn with_env_loader(mut self, loader: EnvLoader) -> Self {
        self.env = loader;
        self
    }

    /// Resolve relative paths against `dir` instead of the working directory.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Paths for `kind` after resolution against the base directory.
    #[must_use]
    pub fn paths(&self, kind: SourceKind) -> Vec<Utf8PathBuf> {
        let Some(paths) = self.paths.get(&kind) else {
            return Vec::new();
        };
        paths.iter().map(|path| self.resolve(path)).collect()
    }

    fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Priority order used for merging.
    #[must_use]
    pub const fn priority(&self) -> &PriorityOrder {
        &self.priority
    }

    /// Merge strategy used for merging.
    #[must_use]
    pub const fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Schema applied after merging, if any.
    #[must_use]
    pub const fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }
}

/// Loads every source named by the priority order, merges the trees, and
/// validates the result.
///
/// Each source kind has a [`SourceLoader`]. File kinds default to
/// [`FileLoader`] and `env` defaults to the options' [`EnvLoader`]; any of
/// them can be replaced, which is how an XML parser is plugged in.
///
/// ```rust,no_run
/// use camino::Utf8PathBuf;
/// use serde_json::json;
/// use stratum_config::{ConfigAssembler, LoadOptions, SourceKind, SourceTree};
///
/// let assembler = ConfigAssembler::new(LoadOptions::new()).with_loader(
///     SourceKind::Xml,
///     |_: &[Utf8PathBuf]| -> SourceTree { SourceTree::new() },
/// );
/// let config = assembler.assemble()?;
/// println!("{}", json!(config));
/// # Ok::<_, std::sync::Arc<stratum_config::StratumError>>(())
/// ```
pub struct ConfigAssembler {
    options: LoadOptions,
    loaders: BTreeMap<SourceKind, Box<dyn SourceLoader>>,
}

impl ConfigAssembler {
    /// Assembler with the default loader for every kind.
    #[must_use]
    pub fn new(options: LoadOptions) -> Self {
        let mut loaders: BTreeMap<SourceKind, Box<dyn SourceLoader>> = BTreeMap::new();
        for kind in SourceKind::ALL {
            let loader: Box<dyn SourceLoader> = match FileFormat::for_kind(kind) {
                Some(format) => Box::new(FileLoader::new(format)),
                None => Box::new(options.env.clone()),
            };
            loaders.insert(kind, loader);
        }
        Self { options, loaders }
    }

    /// Replace the loader used for `kind`.
    #[must_use]
    pub fn with_loader(mut self, kind: SourceKind, loader: impl SourceLoader + 'static) -> Self {
        self.loaders.insert(kind, Box::new(loader));
        self
    }

    /// Options this assembler was built with.
    #[must_use]
    pub const fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load the tree of every kind named by the priority order.
    ///
    /// Kinds outside the order are not read at all.
    #[must_use]
    pub fn load_sources(&self) -> NamedSources {
        self.options
            .priority()
            .as_slice()
            .iter()
            .filter_map(|&kind| {
                let loader = self.loaders.get(&kind)?;
                let tree = loader.load(&self.options.paths(kind));
                tracing::debug!(source = %kind, keys = tree.len(), "loaded source");
                Some((kind, tree))
            })
            .collect()
    }

    /// Load, merge, and validate.
    ///
    /// # Errors
    ///
    /// Returns [`StratumError::Validation`] carrying every violation when a
    /// schema is configured and the merged tree does not satisfy it.
    pub fn assemble(&self) -> StratumResult<SourceTree> {
        let sources = self.load_sources();
        let merged = merge_by_priority(
            &sources,
            self.options.priority().as_slice(),
            self.options.strategy(),
        );
        tracing::debug!(
            priority = %self.options.priority(),
            strategy = %self.options.strategy(),
            keys = merged.len(),
            "merged configuration sources"
        );
        match self.options.schema() {
            Some(schema) => validate(&merged, schema).map_err(|failure| {
                tracing::warn!(violations = failure.len(), "configuration failed validation");
                Arc::new(StratumError::from(failure))
            }),
            None => Ok(merged),
        }
    }
}

impl fmt::Debug for ConfigAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigAssembler")
            .field("options", &self.options)
            .field("loaders", &self.loaders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Assemble configuration from `options` with the default loaders.
///
/// # Errors
///
/// Returns [`StratumError::Validation`] when a schema is configured and
/// the merged tree violates it.
///
/// # Examples
///
/// ```rust,no_run
/// use stratum_config::{EnvironmentDetector, LoadOptions, load_config};
///
/// let env = EnvironmentDetector::new().detect().clone();
/// let config = load_config(LoadOptions::for_environment(&env))?;
/// println!("{} keys", config.len());
/// # Ok::<_, std::sync::Arc<stratum_config::StratumError>>(())
/// ```
pub fn load_config(options: LoadOptions) -> StratumResult<SourceTree> {
    ConfigAssembler::new(options).assemble()
}
