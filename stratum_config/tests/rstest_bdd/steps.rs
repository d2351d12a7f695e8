//! Step definitions for priority-ordered assembly.

use anyhow::{Context, Result, anyhow, ensure};
use camino::Utf8Path;
use rstest_bdd_macros::{given, then, when};
use serde_json::{Map, Value};
use stratum_config::{
    EnvLoader, EnvironmentName, FieldRule, LoadOptions, MergeStrategy, PriorityOrder, Schema,
    SourceKind, load_config, lookup,
};
use test_helpers::figment::with_jail;

use crate::fixtures::{AssemblyContext, ENV_PREFIX};

fn parse_scalar(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

fn set_path(root: &mut Value, key: &str, value: Value) -> Result<()> {
    let mut current = root;
    let mut segments = key.split('.').peekable();
    while let Some(segment) = segments.next() {
        let map = current
            .as_object_mut()
            .ok_or_else(|| anyhow!("'{key}' passes through a non-mapping value"))?;
        if segments.peek().is_none() {
            map.insert(segment.to_owned(), value);
            return Ok(());
        }
        current = map
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    Ok(())
}

fn render_ini(tree: &Value) -> String {
    let Some(map) = tree.as_object() else {
        return String::new();
    };
    let mut top = String::new();
    let mut sections = String::new();
    for (key, value) in map {
        match value {
            Value::Object(section) => {
                sections.push_str(&format!("[{key}]\n"));
                for (name, inner) in section {
                    sections.push_str(&format!("{name} = {}\n", render_text(inner)));
                }
            }
            other => top.push_str(&format!("{key} = {}\n", render_text(other))),
        }
    }
    top + &sections
}

fn render_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn render_file(name: &str, tree: &Value) -> String {
    match Utf8Path::new(name).extension() {
        Some("ini") => render_ini(tree),
        // JSON is valid YAML, so both formats share the same text.
        _ => tree.to_string(),
    }
}

#[given("the file \"{name}\" sets \"{key}\" to \"{value}\"")]
fn file_sets(assembly_context: &AssemblyContext, name: String, key: String, value: String) -> Result<()> {
    let mut files = assembly_context.files.get_or_insert_with(Vec::new);
    let index = match files.iter().position(|(existing, _)| *existing == name) {
        Some(index) => index,
        None => {
            files.push((name, Value::Object(Map::new())));
            files.len() - 1
        }
    };
    let (_, tree) = files
        .get_mut(index)
        .ok_or_else(|| anyhow!("file entry vanished"))?;
    set_path(tree, &key, parse_scalar(value))
}

#[given("the environment variable \"{key}\" is \"{value}\"")]
fn env_var(assembly_context: &AssemblyContext, key: String, value: String) {
    assembly_context
        .env_vars
        .get_or_insert_with(Vec::new)
        .push((key, value));
}

#[given("the priority order is \"{order}\"")]
fn priority_order(assembly_context: &AssemblyContext, order: String) {
    assembly_context.priority.set(order);
}

#[given("the merge strategy is \"{strategy}\"")]
fn merge_strategy(assembly_context: &AssemblyContext, strategy: String) {
    assembly_context.strategy.set(strategy);
}

#[given("the environment is \"{name}\"")]
fn environment(assembly_context: &AssemblyContext, name: String) {
    assembly_context.environment.set(name);
}

#[given("the schema requires \"{key}\"")]
fn schema_requires(assembly_context: &AssemblyContext, key: String) {
    let schema = assembly_context
        .schema
        .take()
        .unwrap_or_default()
        .field(key, FieldRule::new().required());
    assembly_context.schema.set(schema);
}

fn build_options(assembly_context: &AssemblyContext) -> Result<LoadOptions> {
    let mut options = match assembly_context.environment.take() {
        Some(name) => LoadOptions::for_environment(&EnvironmentName::new(name)),
        None => LoadOptions::new(),
    };
    options = options
        .with_paths(SourceKind::Env, Vec::<String>::new())
        .with_env_loader(EnvLoader::new().prefixed(ENV_PREFIX));
    if let Some(order) = assembly_context.priority.take() {
        options = options.with_priority(order.parse::<PriorityOrder>()?);
    }
    if let Some(strategy) = assembly_context.strategy.take() {
        options = options.with_strategy(strategy.parse::<MergeStrategy>()?);
    }
    if let Some(schema) = assembly_context.schema.take() {
        options = options.with_schema(schema);
    }
    Ok(options)
}

#[when("the configuration is assembled")]
fn assemble(assembly_context: &AssemblyContext) -> Result<()> {
    let options = build_options(assembly_context)?;
    let files = assembly_context.files.take().unwrap_or_default();
    let env_vars = assembly_context.env_vars.take().unwrap_or_default();
    let outcome = with_jail(|jail| {
        for (name, tree) in &files {
            jail.create_file(name, &render_file(name, tree))?;
        }
        for (key, value) in &env_vars {
            jail.set_env(format!("{ENV_PREFIX}{key}"), value);
        }
        Ok(load_config(options)
            .map(Value::Object)
            .map_err(|err| err.to_string()))
    })
    .context("run assembly inside a jail")?;
    assembly_context.outcome.set(outcome);
    Ok(())
}

fn merged_tree(assembly_context: &AssemblyContext) -> Result<Map<String, Value>> {
    let outcome = assembly_context
        .outcome
        .with_ref(|outcome| outcome.clone())
        .ok_or_else(|| anyhow!("the configuration was not assembled"))?;
    match outcome {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(anyhow!("assembly produced a non-mapping value: {other}")),
        Err(message) => Err(anyhow!("assembly failed: {message}")),
    }
}

#[then("the value at \"{key}\" is \"{expected}\"")]
fn value_is(assembly_context: &AssemblyContext, key: String, expected: String) -> Result<()> {
    let tree = merged_tree(assembly_context)?;
    let actual = lookup(&tree, &key)
        .map(render_text)
        .ok_or_else(|| anyhow!("no value at '{key}' in {}", Value::Object(tree.clone())))?;
    ensure!(actual == expected, "expected '{expected}' at '{key}', found '{actual}'");
    Ok(())
}

#[then("there is no value at \"{key}\"")]
fn no_value(assembly_context: &AssemblyContext, key: String) -> Result<()> {
    let tree = merged_tree(assembly_context)?;
    ensure!(lookup(&tree, &key).is_none(), "unexpected value at '{key}'");
    Ok(())
}

#[then("assembly fails mentioning \"{fragment}\"")]
fn fails_with(assembly_context: &AssemblyContext, fragment: String) -> Result<()> {
    let message = assembly_context
        .outcome
        .with_ref(|outcome| outcome.as_ref().err().cloned())
        .flatten()
        .ok_or_else(|| anyhow!("expected assembly to fail"))?;
    ensure!(
        message.contains(&fragment),
        "expected '{fragment}' in error: {message}"
    );
    Ok(())
}
