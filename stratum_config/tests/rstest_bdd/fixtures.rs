//! Shared fixtures for the behaviour suite.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::Value;
use stratum_config::Schema;

/// Prefix applied to every environment variable a scenario defines, so the
/// host environment never leaks into assertions.
pub const ENV_PREFIX: &str = "STRATUM_BDD_";

/// Inputs collected by `Given` steps and the outcome of assembly.
#[derive(Debug, Default, ScenarioState)]
pub struct AssemblyContext {
    /// File name and the tree written to it, in declaration order.
    pub files: Slot<Vec<(String, Value)>>,
    /// Environment variables without the scenario prefix.
    pub env_vars: Slot<Vec<(String, String)>>,
    pub priority: Slot<String>,
    pub strategy: Slot<String>,
    pub environment: Slot<String>,
    pub schema: Slot<Schema>,
    /// Merged tree, or the rendered error.
    pub outcome: Slot<Result<Value, String>>,
}

/// Creates a clean context for each scenario.
#[fixture]
pub fn assembly_context() -> AssemblyContext {
    AssemblyContext::default()
}
