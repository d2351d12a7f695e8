//! Unit tests driving commands through parsed command lines.

use anyhow::{Result, anyhow};
use clap::Parser;
use rstest::rstest;
use serde_json::{Value, json};
use test_helpers::figment::{create_files, figment_error, with_jail};
use test_helpers::tree::tree;

use super::files::ENV_TEMPLATE;
use super::run;
use crate::cli::Cli;
use crate::error::CliError;

const PREFIX: &str = "STRATUM_CLI_";

type Outcome = (crate::error::Result<()>, String);

/// Parse `args` after the binary name and an isolating `--env-prefix`, run
/// the command, and capture what it printed.
fn invoke(args: &[&str]) -> Result<Outcome, clap::Error> {
    let argv = ["stratum", "--env-prefix", PREFIX]
        .into_iter()
        .chain(args.iter().copied());
    let cli = Cli::try_parse_from(argv)?;
    let mut out = Vec::new();
    let outcome = run(&cli, &mut out);
    Ok((outcome, String::from_utf8_lossy(&out).into_owned()))
}

fn succeeded((outcome, output): Outcome) -> Result<String> {
    outcome.map_err(|err| anyhow!("command failed: {err}"))?;
    Ok(output)
}

#[rstest]
fn show_prints_the_merged_tree() -> Result<()> {
    let output = succeeded(with_jail(|jail| {
        create_files(
            jail,
            &[
                ("config.json", r#"{"port": 3000, "server": {"host": "json"}}"#),
                ("config.yaml", "server:\n  host: yaml\n"),
            ],
        )?;
        jail.set_env("STRATUM_CLI_port", "8080");
        invoke(&["show"]).map_err(figment_error)
    })?)?;

    let printed: Value = serde_json::from_str(&output)?;
    assert_eq!(printed, json!({"port": "8080", "server": {"host": "yaml"}}));
    Ok(())
}

#[rstest]
#[case("server.host", "localhost\n")]
#[case("server.port", "8080\n")]
#[case("tags", "[\n  \"a\"\n]\n")]
fn get_prints_strings_bare_and_other_values_as_json(
    #[case] key: &str,
    #[case] expected: &str,
) -> Result<()> {
    let output = succeeded(with_jail(|jail| {
        jail.create_file(
            "config.json",
            r#"{"server": {"host": "localhost", "port": 8080}, "tags": ["a"]}"#,
        )?;
        invoke(&["get", key]).map_err(figment_error)
    })?)?;
    assert_eq!(output, expected);
    Ok(())
}

#[rstest]
fn get_reports_missing_keys() -> Result<()> {
    let (outcome, output) = with_jail(|jail| {
        jail.create_file("config.json", r#"{"server": {}}"#)?;
        invoke(&["get", "server.port"]).map_err(figment_error)
    })?;
    assert!(matches!(outcome, Err(CliError::MissingKey(key)) if key == "server.port"));
    assert!(output.is_empty());
    Ok(())
}

#[rstest]
fn keys_follow_merge_order() -> Result<()> {
    let output = succeeded(with_jail(|jail| {
        jail.create_file("config.json", r#"{"b": 1, "a": 2}"#)?;
        jail.set_env("STRATUM_CLI_c", "3");
        invoke(&["keys"]).map_err(figment_error)
    })?)?;
    assert_eq!(output, "b\na\nc\n");
    Ok(())
}

#[rstest]
fn priority_and_strategy_flags_reach_the_merge() -> Result<()> {
    let output = succeeded(with_jail(|jail| {
        create_files(
            jail,
            &[
                ("config.json", r#"{"tags": ["json"]}"#),
                ("config.toml", "tags = [\"toml\"]\n"),
            ],
        )?;
        invoke(&["--priority", "toml,json", "--strategy", "concat-arrays", "show"])
            .map_err(figment_error)
    })?)?;
    let printed: Value = serde_json::from_str(&output)?;
    assert_eq!(printed, json!({"tags": ["toml", "json"]}));
    Ok(())
}

#[rstest]
#[case(&["--priority", "json,json", "show"])]
#[case(&["--priority", "json,etcd", "show"])]
#[case(&["--strategy", "zip", "show"])]
fn rejects_malformed_merge_flags(#[case] args: &[&str]) {
    assert!(invoke(args).is_err());
}

#[rstest]
fn validate_applies_schema_files() -> Result<()> {
    let (outcome, _) = with_jail(|jail| {
        create_files(
            jail,
            &[
                ("config.json", r#"{"port": 70000}"#),
                (
                    "schema.yaml",
                    "apiKey:\n  type: string\n  required: true\nport:\n  type: number\n  max: 65535\n",
                ),
            ],
        )?;
        invoke(&["validate", "--schema", "schema.yaml"]).map_err(figment_error)
    })?;
    let Err(CliError::Configuration(err)) = outcome else {
        return Err(anyhow!("expected a configuration error"));
    };
    let failure = err
        .validation_failure()
        .ok_or_else(|| anyhow!("expected a validation failure, got {err}"))?;
    assert_eq!(
        failure.messages(),
        vec!["apiKey is required", "port must be at most 65535, got 70000"]
    );
    Ok(())
}

#[rstest]
fn validate_reports_key_count() -> Result<()> {
    let output = succeeded(with_jail(|jail| {
        create_files(
            jail,
            &[
                ("config.json", r#"{"apiKey": "k"}"#),
                ("schema.json", r#"{"port": {"type": "number", "default": 3000}}"#),
            ],
        )?;
        invoke(&["validate", "--schema", "schema.json"]).map_err(figment_error)
    })?)?;
    assert_eq!(output, "configuration is valid (2 top-level keys)\n");
    Ok(())
}

#[rstest]
#[case("missing.json", "file not found")]
#[case("schema.txt", "unrecognised file extension")]
fn validate_rejects_unusable_schema_files(#[case] path: &str, #[case] reason: &str) -> Result<()> {
    let (outcome, _) = with_jail(|jail| {
        jail.create_file("schema.txt", "{}")?;
        invoke(&["validate", "--schema", path]).map_err(figment_error)
    })?;
    match outcome {
        Err(CliError::Schema { reason: actual, .. }) => assert_eq!(actual, reason),
        other => return Err(anyhow!("expected a schema error, got {other:?}")),
    }
    Ok(())
}

#[rstest]
fn check_lists_every_missing_field() -> Result<()> {
    let (outcome, _) = with_jail(|jail| {
        jail.create_file("config.json", r#"{"DATABASE_URL": null}"#)?;
        invoke(&["check"]).map_err(figment_error)
    })?;
    match outcome {
        Err(CliError::MissingFields(fields)) => {
            assert_eq!(fields, vec!["API_KEY", "DATABASE_URL"]);
        }
        other => return Err(anyhow!("expected missing fields, got {other:?}")),
    }
    Ok(())
}

#[rstest]
fn check_reads_required_fields_from_the_environment() -> Result<()> {
    let output = succeeded(with_jail(|jail| {
        jail.set_env("REQUIRED_FIELDS", "API_KEY, server.port");
        jail.set_env("STRATUM_CLI_API_KEY", "secret");
        jail.create_file("config.json", r#"{"server": {"port": 1}}"#)?;
        invoke(&["check"]).map_err(figment_error)
    })?)?;
    assert_eq!(output, "all required fields are present\n");
    Ok(())
}

#[rstest]
fn env_command_reads_environment_specific_files() -> Result<()> {
    let output = succeeded(with_jail(|jail| {
        create_files(
            jail,
            &[
                ("config.json", r#"{"level": "base", "shared": true}"#),
                ("config.staging.json", r#"{"level": "staging"}"#),
                (".env.staging", "STRATUM_CLI_region=eu\n"),
            ],
        )?;
        invoke(&["env", "staging"]).map_err(figment_error)
    })?)?;

    let (header, body) = output
        .split_once('\n')
        .ok_or_else(|| anyhow!("missing header in {output:?}"))?;
    assert_eq!(header, "environment: staging");
    assert_eq!(
        tree(serde_json::from_str(body)?)?,
        tree(json!({"level": "staging", "shared": true, "region": "eu"}))?
    );
    Ok(())
}

#[rstest]
fn list_marks_candidates_for_the_detected_environment() -> Result<()> {
    let output = succeeded(with_jail(|jail| {
        jail.set_env("STRATUM_ENV", "qa");
        create_files(jail, &[("config.qa.toml", ""), (".env", "")])?;
        invoke(&["list"]).map_err(figment_error)
    })?)?;

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.first(), Some(&"environment: qa"));
    assert_eq!(lines.len(), 17);
    assert!(lines.contains(&"found   env  .env"));
    assert!(lines.contains(&"missing env  .env.qa"));
    assert!(lines.contains(&"found   toml config.qa.toml"));
    assert!(lines.contains(&"missing json config.json"));
    Ok(())
}

#[rstest]
fn generate_env_writes_the_template() -> Result<()> {
    let (output, written) = with_jail(|jail| {
        let (outcome, output) = invoke(&["generate-env", "--output", "sample.env"])
            .map_err(figment_error)?;
        outcome.map_err(figment_error)?;
        let written = std::fs::read_to_string(jail.directory().join("sample.env"))
            .map_err(figment_error)?;
        Ok((output, written))
    })?;
    assert_eq!(output, "wrote sample.env\n");
    assert_eq!(written, ENV_TEMPLATE);
    assert!(written.contains("API_KEY="));
    assert!(written.contains("STRATUM_ENV=development"));
    Ok(())
}
