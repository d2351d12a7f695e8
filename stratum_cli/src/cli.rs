//! Command-line surface of the `stratum` binary.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use stratum_config::{EnvLoader, EnvironmentName, LoadOptions, MergeStrategy, PriorityOrder};

/// Inspect, validate and scaffold layered configuration.
#[derive(Debug, Parser)]
#[command(
    name = "stratum",
    bin_name = "stratum",
    about = "Inspect and validate configuration merged from env, JSON, YAML, TOML, XML and INI sources",
    version
)]
pub struct Cli {
    /// Options shared by every subcommand.
    #[command(flatten)]
    pub globals: GlobalArgs,
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Options controlling how configuration is assembled.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Directory that relative configuration paths resolve against.
    #[arg(long, short = 'd', value_name = "DIR", global = true)]
    pub dir: Option<Utf8PathBuf>,
    /// Comma-separated sources, lowest priority first.
    #[arg(long, short = 'p', value_name = "SOURCES", global = true)]
    pub priority: Option<PriorityOrder>,
    /// How colliding values are combined.
    #[arg(long, short = 's', value_name = "STRATEGY", global = true)]
    pub strategy: Option<MergeStrategy>,
    /// Read the shared and environment-specific files for this environment.
    #[arg(long = "env", short = 'e', value_name = "NAME", global = true)]
    pub environment: Option<String>,
    /// Only read environment variables with this prefix, stripping it.
    #[arg(long, value_name = "PREFIX", global = true)]
    pub env_prefix: Option<String>,
    /// Expand `__` in variable names into nested keys.
    #[arg(long, global = true)]
    pub nested_env: bool,
}

impl GlobalArgs {
    /// Environment requested with `--env`, if any.
    #[must_use]
    pub fn environment(&self) -> Option<EnvironmentName> {
        self.environment.as_deref().map(EnvironmentName::new)
    }

    /// Assembly options for `environment`, or the default file names when
    /// no environment applies.
    #[must_use]
    pub fn load_options(&self, environment: Option<&EnvironmentName>) -> LoadOptions {
        let mut options = environment.map_or_else(LoadOptions::new, LoadOptions::for_environment);
        if let Some(priority) = &self.priority {
            options = options.with_priority(priority.clone());
        }
        if let Some(strategy) = self.strategy {
            options = options.with_strategy(strategy);
        }
        if let Some(dir) = &self.dir {
            options = options.with_base_dir(dir.clone());
        }
        let env = self
            .env_prefix
            .as_ref()
            .map_or_else(EnvLoader::new, |prefix| EnvLoader::new().prefixed(prefix.clone()))
            .nested(self.nested_env);
        options.with_env_loader(env)
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the merged configuration as JSON.
    Show,
    /// Print the value at a dotted key such as `server.port`.
    Get {
        /// Dotted key path; array elements are addressed by index.
        key: String,
    },
    /// List the top-level keys of the merged configuration.
    Keys,
    /// Load the configuration and report whether it is usable.
    Validate {
        /// Schema document (JSON, YAML or TOML) to validate against.
        #[arg(long, value_name = "FILE")]
        schema: Option<Utf8PathBuf>,
    },
    /// Fail unless every required field has a value.
    Check {
        /// Comma-separated keys that must be present.
        #[arg(
            long,
            value_name = "KEYS",
            env = "REQUIRED_FIELDS",
            value_delimiter = ',',
            default_value = "API_KEY,DATABASE_URL"
        )]
        fields: Vec<String>,
    },
    /// Show the configuration for an environment.
    Env {
        /// Environment name; detected from the process environment when omitted.
        name: Option<String>,
    },
    /// List candidate configuration files and whether each exists.
    List,
    /// Write a template `.env` file documenting common variables.
    GenerateEnv {
        /// Output file, relative to `--dir` when given.
        #[arg(long, short = 'o', value_name = "FILE", default_value = ".env.template")]
        output: Utf8PathBuf,
    },
}
