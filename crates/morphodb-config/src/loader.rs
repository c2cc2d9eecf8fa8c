// Copyright 2025 MorphoDB Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, MorphoDbConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "morphodb.toml";

/// Find the morphodb configuration file
///
/// Search order:
/// 1. `MORPHODB_CONFIG_PATH` environment variable
/// 2. Current working directory: `./morphodb.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("MORPHODB_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by MORPHODB_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet MORPHODB_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<MorphoDbConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: MorphoDbConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `MORPHODB_DB_PATH` -> `database.path`
/// - `MORPHODB_DB_FILE` -> `database.classification_file`
/// - `MORPHODB_EXTENSION` -> `database.morphology_extension`
/// - `MORPHODB_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut MorphoDbConfig) {
    if let Ok(value) = env::var("MORPHODB_DB_PATH") {
        config.database.path = PathBuf::from(value);
    }
    if let Ok(value) = env::var("MORPHODB_DB_FILE") {
        config.database.classification_file = Some(value);
    }
    if let Ok(value) = env::var("MORPHODB_EXTENSION") {
        config.database.morphology_extension = Some(value);
    }
    if let Ok(value) = env::var("MORPHODB_LOG_LEVEL") {
        config.logging.level = value.to_lowercase();
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Map of CLI arguments (e.g., `{"db_path": "/data", "log_level": "debug"}`)
pub fn apply_cli_overrides(config: &mut MorphoDbConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("db_path") {
        config.database.path = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("db_file") {
        config.database.classification_file = Some(value.clone());
    }
    if let Some(value) = cli_args.get("extension") {
        config.database.morphology_extension = Some(value.clone());
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: &[&str] = &[
        "MORPHODB_DB_PATH",
        "MORPHODB_DB_FILE",
        "MORPHODB_EXTENSION",
        "MORPHODB_LOG_LEVEL",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("MORPHODB_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("MORPHODB_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();

        env::set_var("MORPHODB_CONFIG_PATH", dir.path().join("nope.toml"));
        let result = find_config_file();
        env::remove_var("MORPHODB_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[database]").unwrap();
        writeln!(file, "path = \"/data/morphologies\"").unwrap();
        writeln!(file, "classification_file = \"neurondb.dat\"").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.database.path, PathBuf::from("/data/morphologies"));
        assert_eq!(config.database.classification_file.as_deref(), Some("neurondb.dat"));
        assert_eq!(config.database.morphology_extension, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_invalid_toml() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[database\n").unwrap();

        assert!(matches!(
            load_config(Some(&config_path), None),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = MorphoDbConfig::default();

        env::set_var("MORPHODB_DB_PATH", "/env/db");
        env::set_var("MORPHODB_LOG_LEVEL", "DEBUG");

        apply_environment_overrides(&mut config);
        clear_env();

        assert_eq!(config.database.path, PathBuf::from("/env/db"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = MorphoDbConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("db_file".to_string(), "layers.dat".to_string());
        cli_args.insert("extension".to_string(), "h5".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.database.classification_file.as_deref(), Some("layers.dat"));
        assert_eq!(config.database.morphology_extension.as_deref(), Some("h5"));
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[database]").unwrap();
        writeln!(file, "path = \"/file/db\"").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"warn\"").unwrap();

        env::set_var("MORPHODB_DB_PATH", "/env/db");
        env::set_var("MORPHODB_LOG_LEVEL", "error");

        let mut cli_args = HashMap::new();
        cli_args.insert("db_path".to_string(), "/cli/db".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();
        clear_env();

        // CLI wins for path, env wins for level (no CLI override)
        assert_eq!(config.database.path, PathBuf::from("/cli/db"));
        assert_eq!(config.logging.level, "error");
    }
}
