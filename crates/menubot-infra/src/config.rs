//! Configuration loader for menubot.
//!
//! Reads `menubot.toml` and deserializes it into [`AppConfig`], then layers
//! environment variables on top. A missing file means defaults; a file that
//! exists but cannot be read or parsed is an error, since silently serving
//! with the wrong credentials is worse than not starting.
//!
//! Variables may also come from a `.env` file in the working directory.
//! Values already present in the process environment take precedence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use menubot_types::config::AppConfig;
use menubot_types::error::RegistryError;

/// Errors from loading configuration or flow files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid flow table in {}: {source}", path.display())]
    Flows {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },
}

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "menubot.toml";

/// Dotenv file consulted by [`load_config`], relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Load configuration from `path` and apply environment overrides from the
/// process environment and [`DOTENV_FILE`].
///
/// - If the file does not exist, starts from [`AppConfig::default()`].
/// - If the file exists but cannot be read or parsed, returns [`ConfigError`].
pub async fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    load_config_with(path, Path::new(DOTENV_FILE), |key| std::env::var(key).ok()).await
}

/// [`load_config`] with an explicit dotenv path and process environment.
pub async fn load_config_with<F>(
    path: &Path,
    dotenv_path: &Path,
    process_env: F,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_config_file(path).await?;
    let dotenv = read_dotenv(dotenv_path);
    Ok(apply_env_overrides(config, |key| {
        process_env(key)
            .filter(|value| !value.is_empty())
            .or_else(|| dotenv.get(key).cloned())
    }))
}

/// Read `KEY=value` pairs from a dotenv file.
///
/// A missing file yields no variables. Lines that fail to parse are skipped
/// with a warning.
pub fn read_dotenv(path: &Path) -> HashMap<String, String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) => {
            if !err.not_found() {
                tracing::warn!("Ignoring {}: {err}", path.display());
            }
            return HashMap::new();
        }
    };

    let mut vars = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(err) => tracing::warn!("Skipping line in {}: {err}", path.display()),
        }
    }
    tracing::debug!(count = vars.len(), "Loaded variables from {}", path.display());
    vars
}

/// Load configuration from `path` without looking at the environment.
pub async fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str::<AppConfig>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Overlay environment variables onto `config`.
///
/// `lookup` returns the value of a variable, if set. Empty values count as
/// unset. Numeric variables that fail to parse are ignored with a warning.
///
/// | Variable | Field |
/// |---|---|
/// | `HOST` | `server.host` |
/// | `PORT` | `server.port` |
/// | `WHATSAPP_VERIFY_TOKEN` | `whatsapp.verify_token` |
/// | `WHATSAPP_ACCESS_TOKEN` | `whatsapp.access_token` |
/// | `WHATSAPP_PHONE_NUMBER_ID` | `whatsapp.phone_number_id` |
/// | `MY_PHONE_NUMBER` | `whatsapp.recipient_override` |
/// | `WHATSAPP_APP_SECRET` | `whatsapp.app_secret` |
/// | `LOG_LEVEL` | `logging.level` |
/// | `SESSION_EXPIRATION_HOURS` | `session.expiration_hours` |
/// | `SESSION_CLEANUP_INTERVAL_MIN` | `session.cleanup_interval_min` |
/// | `MENUBOT_FLOWS` | `flows_path` |
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

    if let Some(host) = var("HOST") {
        config.server.host = host;
    }
    if let Some(port) = parse_var(&var, "PORT") {
        config.server.port = port;
    }

    let wa = &mut config.whatsapp;
    for (key, field) in [
        ("WHATSAPP_VERIFY_TOKEN", &mut wa.verify_token),
        ("WHATSAPP_ACCESS_TOKEN", &mut wa.access_token),
        ("WHATSAPP_PHONE_NUMBER_ID", &mut wa.phone_number_id),
        ("MY_PHONE_NUMBER", &mut wa.recipient_override),
        ("WHATSAPP_APP_SECRET", &mut wa.app_secret),
    ] {
        if let Some(value) = var(key) {
            *field = value;
        }
    }

    if let Some(level) = var("LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(hours) = parse_var(&var, "SESSION_EXPIRATION_HOURS") {
        config.session.expiration_hours = hours;
    }
    if let Some(minutes) = parse_var(&var, "SESSION_CLEANUP_INTERVAL_MIN") {
        config.session.cleanup_interval_min = minutes;
    }
    if let Some(flows) = var("MENUBOT_FLOWS") {
        config.flows_path = Some(PathBuf::from(flows));
    }

    config
}

fn parse_var<T, F>(var: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = var(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("Ignoring {key}={raw:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn test_load_config_file_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_file(&tmp.path().join("menubot.toml")).await.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.expiration_hours, 24);
        assert!(config.whatsapp.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_load_config_file_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("menubot.toml");
        tokio::fs::write(
            &path,
            r#"
flows_path = "flows.toml"

[server]
port = 9090

[whatsapp]
verify_token = "verify-me"
phone_number_id = "1234567890"

[session]
expiration_hours = 2
cleanup_interval_min = 5
"#,
        )
        .await
        .unwrap();

        let config = load_config_file(&path).await.unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.whatsapp.verify_token, "verify-me");
        assert_eq!(config.whatsapp.phone_number_id, "1234567890");
        assert_eq!(config.session.expiration_hours, 2);
        assert_eq!(config.session.cleanup_interval_min, 5);
        assert_eq!(config.flows_path, Some(PathBuf::from("flows.toml")));
    }

    #[tokio::test]
    async fn test_load_config_file_invalid_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("menubot.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_config_file(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("menubot.toml"));
    }

    #[tokio::test]
    async fn test_load_config_file_directory_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_file(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let config = apply_env_overrides(
            AppConfig::default(),
            env(&[
                ("HOST", "127.0.0.1"),
                ("PORT", "3000"),
                ("WHATSAPP_VERIFY_TOKEN", "vt"),
                ("WHATSAPP_ACCESS_TOKEN", "EAAG"),
                ("WHATSAPP_PHONE_NUMBER_ID", "555"),
                ("MY_PHONE_NUMBER", "5493431111111"),
                ("WHATSAPP_APP_SECRET", "shh"),
                ("LOG_LEVEL", "debug"),
                ("SESSION_EXPIRATION_HOURS", "1"),
                ("SESSION_CLEANUP_INTERVAL_MIN", "1"),
                ("MENUBOT_FLOWS", "/etc/menubot/flows.toml"),
            ]),
        );

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.whatsapp.verify_token, "vt");
        assert_eq!(config.whatsapp.access_token, "EAAG");
        assert_eq!(config.whatsapp.phone_number_id, "555");
        assert_eq!(config.whatsapp.recipient_override, "5493431111111");
        assert_eq!(config.whatsapp.app_secret, "shh");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.session.expiration_hours, 1);
        assert_eq!(config.session.cleanup_interval_min, 1);
        assert_eq!(
            config.flows_path,
            Some(PathBuf::from("/etc/menubot/flows.toml"))
        );
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut base = AppConfig::default();
        base.whatsapp.verify_token = "from-file".to_string();

        let config = apply_env_overrides(base, env(&[("WHATSAPP_VERIFY_TOKEN", ""), ("PORT", "")]));
        assert_eq!(config.whatsapp.verify_token, "from-file");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_unparseable_numbers_keep_previous_value() {
        let config = apply_env_overrides(
            AppConfig::default(),
            env(&[("PORT", "eighty"), ("SESSION_EXPIRATION_HOURS", "-3")]),
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.expiration_hours, 24);
    }

    #[test]
    fn test_read_dotenv_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_dotenv(&tmp.path().join(".env")).is_empty());
    }

    #[test]
    fn test_read_dotenv_parses_pairs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        std::fs::write(
            &path,
            "# WhatsApp\nWHATSAPP_VERIFY_TOKEN=from-dotenv\nMY_PHONE_NUMBER=\"5493431111111\"\n",
        )
        .unwrap();

        let vars = read_dotenv(&path);
        assert_eq!(vars.get("WHATSAPP_VERIFY_TOKEN").unwrap(), "from-dotenv");
        assert_eq!(vars.get("MY_PHONE_NUMBER").unwrap(), "5493431111111");
    }

    #[tokio::test]
    async fn test_load_config_with_reads_dotenv_credentials() {
        let tmp = TempDir::new().unwrap();
        let dotenv = tmp.path().join(".env");
        tokio::fs::write(
            &dotenv,
            "WHATSAPP_VERIFY_TOKEN=from-dotenv\nWHATSAPP_ACCESS_TOKEN=EAAG\nPORT=3000\n",
        )
        .await
        .unwrap();

        let config = load_config_with(&tmp.path().join("menubot.toml"), &dotenv, env(&[]))
            .await
            .unwrap();
        assert_eq!(config.whatsapp.verify_token, "from-dotenv");
        assert_eq!(config.whatsapp.access_token, "EAAG");
        assert_eq!(config.server.port, 3000);
    }

    #[tokio::test]
    async fn test_load_config_with_process_env_wins_over_dotenv() {
        let tmp = TempDir::new().unwrap();
        let dotenv = tmp.path().join(".env");
        tokio::fs::write(&dotenv, "WHATSAPP_VERIFY_TOKEN=from-dotenv\nLOG_LEVEL=debug\n")
            .await
            .unwrap();

        let config = load_config_with(
            &tmp.path().join("menubot.toml"),
            &dotenv,
            env(&[("WHATSAPP_VERIFY_TOKEN", "from-env"), ("LOG_LEVEL", "")]),
        )
        .await
        .unwrap();
        assert_eq!(config.whatsapp.verify_token, "from-env");
        assert_eq!(config.logging.level, "debug");
    }
}
