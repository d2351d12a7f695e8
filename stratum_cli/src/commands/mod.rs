//! Subcommand implementations.
//!
//! Every command writes to a caller-supplied [`Write`] so the binary can
//! target stdout while tests capture output in memory.

use std::io::Write;

use camino::Utf8Path;
use serde_json::Value;
use stratum_config::file::load_document;
use stratum_config::{
    EnvironmentDetector, EnvironmentName, FileFormat, Schema, SourceTree, load_config, lookup,
};

use crate::cli::{Cli, Command, GlobalArgs};
use crate::error::{CliError, Result};

mod files;

#[cfg(test)]
mod tests;

/// Execute the parsed command line, writing results to `out`.
///
/// # Errors
///
/// Returns a [`CliError`] when configuration cannot be assembled, a
/// requested key or required field is missing, or output cannot be written.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let globals = &cli.globals;
    match &cli.command {
        Command::Show => show(globals, out),
        Command::Get { key } => get(globals, key, out),
        Command::Keys => keys(globals, out),
        Command::Validate { schema } => validate(globals, schema.as_deref(), out),
        Command::Check { fields } => check(globals, fields, out),
        Command::Env { name } => show_environment(globals, name.as_deref(), out),
        Command::List => files::list(globals, out),
        Command::GenerateEnv { output } => files::generate_env(globals, output, out),
    }
}

fn assemble(globals: &GlobalArgs, schema: Option<Schema>) -> Result<SourceTree> {
    let environment = globals.environment();
    let mut options = globals.load_options(environment.as_ref());
    if let Some(rules) = schema {
        options = options.with_schema(rules);
    }
    Ok(load_config(options)?)
}

/// `--env` when given, otherwise whatever the process environment names.
fn resolve_environment(globals: &GlobalArgs) -> EnvironmentName {
    globals
        .environment()
        .unwrap_or_else(|| EnvironmentDetector::new().detect().clone())
}

fn write_json<W: Write>(out: &mut W, value: &impl serde::Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn show<W: Write>(globals: &GlobalArgs, out: &mut W) -> Result<()> {
    let tree = assemble(globals, None)?;
    write_json(out, &tree)
}

/// Strings print bare so the output can feed shell substitutions.
fn get<W: Write>(globals: &GlobalArgs, key: &str, out: &mut W) -> Result<()> {
    let tree = assemble(globals, None)?;
    match lookup(&tree, key) {
        Some(Value::String(text)) => {
            writeln!(out, "{text}")?;
            Ok(())
        }
        Some(value) => write_json(out, value),
        None => Err(CliError::MissingKey(key.to_owned())),
    }
}

fn keys<W: Write>(globals: &GlobalArgs, out: &mut W) -> Result<()> {
    let tree = assemble(globals, None)?;
    for key in tree.keys() {
        writeln!(out, "{key}")?;
    }
    Ok(())
}

fn read_schema(path: &Utf8Path) -> Result<Schema> {
    let schema_error = |reason: String| CliError::Schema {
        path: path.to_owned(),
        reason,
    };
    let format = FileFormat::from_path(path)
        .ok_or_else(|| schema_error("unrecognised file extension".to_owned()))?;
    let document = load_document(path, format)
        .map_err(|err| schema_error(err.to_string()))?
        .ok_or_else(|| schema_error("file not found".to_owned()))?;
    Ok(Schema::from_value(&Value::Object(document))?)
}

fn validate<W: Write>(globals: &GlobalArgs, schema: Option<&Utf8Path>, out: &mut W) -> Result<()> {
    let parsed = schema.map(read_schema).transpose()?;
    let tree = assemble(globals, parsed)?;
    if tree.is_empty() {
        tracing::warn!("no configuration values were found");
    }
    writeln!(out, "configuration is valid ({} top-level keys)", tree.len())?;
    Ok(())
}

/// A field set to `null` counts as missing.
fn check<W: Write>(globals: &GlobalArgs, fields: &[String], out: &mut W) -> Result<()> {
    let tree = assemble(globals, None)?;
    let missing: Vec<String> = fields
        .iter()
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
        .filter(|field| lookup(&tree, field).is_none_or(Value::is_null))
        .map(str::to_owned)
        .collect();
    if !missing.is_empty() {
        return Err(CliError::MissingFields(missing));
    }
    writeln!(out, "all required fields are present")?;
    Ok(())
}

fn show_environment<W: Write>(globals: &GlobalArgs, name: Option<&str>, out: &mut W) -> Result<()> {
    let environment = name.map_or_else(|| resolve_environment(globals), EnvironmentName::new);
    let tree = load_config(globals.load_options(Some(&environment)))?;
    writeln!(out, "environment: {environment}")?;
    write_json(out, &tree)
}
