//! Binds the feature files to the step registry.

use crate::fixtures::{AssemblyContext, assembly_context};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/priority_merge.feature",
    fixtures = [assembly_context: AssemblyContext]
);
