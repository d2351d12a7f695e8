//! End-to-end assembly from files and environment variables.

use anyhow::{Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use rstest::rstest;
use serde_json::{Value, json};
use stratum_config::{
    ConfigAssembler, EnvLoader, FieldRule, FieldType, LoadOptions, MergeStrategy, Schema,
    SourceKind, SourceTree, StratumError, load_config,
};
use test_helpers::figment::{figment_error, with_jail};

const PREFIX: &str = "STRATUM_IT_";

fn isolated_env(options: LoadOptions) -> LoadOptions {
    options.with_env_loader(EnvLoader::new().prefixed(PREFIX))
}

#[rstest]
fn every_format_contributes_under_the_default_order() -> Result<()> {
    let config = with_jail(|jail| {
        jail.create_file("config.ini", "source = ini\nini_only = true\n[db]\nhost = ini-host\nport = 5432\n")?;
        jail.create_file("config.toml", "source = \"toml\"\n[db]\npool = 4\n")?;
        jail.create_file("config.json", r#"{"source": "json", "db": {"port": 6543}, "tags": ["json"]}"#)?;
        jail.create_file("config.yaml", "source: yaml\ntags: [yaml]\n")?;
        jail.create_file(".env", "STRATUM_IT_source=dotenv\nSTRATUM_IT_token=from-file\n")?;
        jail.set_env("STRATUM_IT_source", "process");
        Ok(load_config(isolated_env(LoadOptions::new())))
    })?
    .map_err(|err| anyhow!(err.to_string()))?;

    assert_eq!(
        Value::Object(config),
        json!({
            "source": "process",
            "ini_only": true,
            "db": {"host": "ini-host", "port": 6543, "pool": 4},
            "tags": ["yaml"],
            "token": "from-file"
        })
    );
    Ok(())
}

#[rstest]
fn concat_arrays_accumulates_across_sources() -> Result<()> {
    let config = with_jail(|jail| {
        jail.create_file("config.json", r#"{"plugins": ["auth"]}"#)?;
        jail.create_file("config.yaml", "plugins:\n  - metrics\n")?;
        let options = isolated_env(LoadOptions::new())
            .with_priority("json,yaml".parse().map_err(figment_error::<StratumError>)?)
            .with_strategy(MergeStrategy::ConcatArrays);
        Ok(load_config(options))
    })?
    .map_err(|err| anyhow!(err.to_string()))?;
    assert_eq!(config.get("plugins"), Some(&json!(["auth", "metrics"])));
    Ok(())
}

#[rstest]
fn malformed_files_are_skipped_without_failing() -> Result<()> {
    let config = with_jail(|jail| {
        jail.create_file("config.json", "{ broken")?;
        jail.create_file("config.yaml", "name: still-here\n")?;
        Ok(load_config(isolated_env(LoadOptions::new())))
    })?
    .map_err(|err| anyhow!(err.to_string()))?;
    assert_eq!(Value::Object(config), json!({"name": "still-here"}));
    Ok(())
}

#[rstest]
fn schema_defaults_and_violations_surface_together() -> Result<()> {
    let schema = Schema::new()
        .field("apiKey", FieldRule::typed(FieldType::String).required())
        .field(
            "port",
            FieldRule::typed(FieldType::Number)
                .default_value(json!(3000))
                .max(65535.0),
        );
    let (valid, invalid) = with_jail(|jail| {
        jail.create_file("config.json", r#"{"apiKey": "k"}"#)?;
        let valid = load_config(isolated_env(LoadOptions::new()).with_schema(schema.clone()));
        jail.create_file("config.json", r#"{"port": 70000}"#)?;
        let invalid = load_config(isolated_env(LoadOptions::new()).with_schema(schema));
        Ok((valid, invalid))
    })?;

    let normalised = valid.map_err(|err| anyhow!(err.to_string()))?;
    assert_eq!(Value::Object(normalised), json!({"apiKey": "k", "port": 3000}));

    let messages = invalid
        .err()
        .and_then(|err| err.validation_failure().map(|failure| failure.messages()))
        .unwrap_or_default();
    assert_eq!(
        messages,
        vec!["apiKey is required", "port must be at most 65535, got 70000"]
    );
    Ok(())
}

#[rstest]
fn custom_loaders_replace_the_defaults() -> Result<()> {
    let config = with_jail(|jail| {
        jail.create_file("config.xml", "<config><port>8080</port></config>")?;
        let xml = |paths: &[Utf8PathBuf]| -> SourceTree {
            let mut tree = SourceTree::new();
            if paths.iter().any(|path| path.as_str() == "config.xml") {
                tree.insert("port".to_owned(), json!(8080));
            }
            tree
        };
        let assembler = ConfigAssembler::new(isolated_env(LoadOptions::new())).with_loader(SourceKind::Xml, xml);
        Ok(assembler.assemble())
    })?
    .map_err(|err| anyhow!(err.to_string()))?;
    assert_eq!(config.get("port"), Some(&json!(8080)));
    Ok(())
}

#[rstest]
fn base_dir_locates_files_outside_the_working_directory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = Utf8Path::from_path(dir.path()).ok_or_else(|| anyhow!("temp dir is not UTF-8"))?;
    std::fs::write(root.join("config.toml"), "[server]\nport = 9000\n")?;
    std::fs::write(root.join(".env"), "STRATUM_IT_mode=file\n")?;

    let config = load_config(isolated_env(LoadOptions::new()).with_base_dir(root))
        .map_err(|err| anyhow!(err.to_string()))?;
    assert_eq!(config.get("server"), Some(&json!({"port": 9000})));
    assert_eq!(config.get("mode"), Some(&json!("file")));
    Ok(())
}
