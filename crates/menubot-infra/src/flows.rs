//! Flow table files.
//!
//! A flow file is TOML with one `[[flows]]` table per state:
//!
//! ```toml
//! [[flows]]
//! state = "welcome"
//! message = "Choose A or B"
//!
//! [[flows.options]]
//! code = "A"
//! label = "A"
//! description = "First"
//! next_state = "option_a"
//!
//! [[flows]]
//! state = "option_a"
//! message = "You chose A"
//! data_request = "details"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use menubot_core::flow::FlowRegistry;
use menubot_types::config::AppConfig;
use menubot_types::flow::Flow;

use crate::config::ConfigError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct FlowFile {
    #[serde(default)]
    flows: Vec<Flow>,
}

/// Load a flow table from `path` into a [`FlowRegistry`].
///
/// Unlike the config file, a flow file that was asked for must exist.
pub async fn load_flow_file(path: &Path) -> Result<FlowRegistry, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let file: FlowFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let registry = FlowRegistry::new(file.flows).map_err(|source| ConfigError::Flows {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded {} flows from {}", registry.len(), path.display());
    Ok(registry)
}

/// The flow table configured in `config`, or the built-in menu.
pub async fn resolve_flows(config: &AppConfig) -> Result<FlowRegistry, ConfigError> {
    match &config.flows_path {
        Some(path) => load_flow_file(path).await,
        None => Ok(FlowRegistry::builtin()),
    }
}

/// Serialize `registry` in flow file format, sorted by state.
pub fn render_flow_file(registry: &FlowRegistry) -> Result<String, toml::ser::Error> {
    let file = FlowFile {
        flows: registry.sorted().into_iter().cloned().collect(),
    };
    toml::to_string_pretty(&file)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use menubot_types::error::RegistryError;
    use menubot_types::flow::StateId;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[[flows]]
state = "welcome"
message = "Choose A or B"

[[flows.options]]
code = "A"
label = "A"
description = "First"
next_state = "option_a"

[[flows]]
state = "option_a"
message = "You chose A"
data_request = "details"
"#;

    #[tokio::test]
    async fn test_load_flow_file_parses_flows_and_options() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flows.toml");
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let registry = load_flow_file(&path).await.unwrap();
        assert_eq!(registry.len(), 2);

        let welcome = registry.lookup(&StateId::welcome()).unwrap();
        assert_eq!(welcome.message, "Choose A or B");
        assert_eq!(welcome.options.len(), 1);
        assert_eq!(welcome.options[0].next_state, StateId::new("option_a"));

        let option_a = registry.lookup(&StateId::new("option_a")).unwrap();
        assert_eq!(option_a.data_request.as_deref(), Some("details"));
        assert!(option_a.options.is_empty());
    }

    #[tokio::test]
    async fn test_load_flow_file_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_flow_file(&tmp.path().join("nope.toml")).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_flow_file_rejects_duplicates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flows.toml");
        tokio::fs::write(
            &path,
            "[[flows]]\nstate = \"welcome\"\nmessage = \"a\"\n\n[[flows]]\nstate = \"welcome\"\nmessage = \"b\"\n",
        )
        .await
        .unwrap();

        let err = load_flow_file(&path).await.unwrap_err();
        match err {
            ConfigError::Flows { source, .. } => {
                assert_eq!(source, RegistryError::DuplicateState(StateId::welcome()))
            }
            other => panic!("expected Flows error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_flows_defaults_to_builtin() {
        let registry = resolve_flows(&AppConfig::default()).await.unwrap();
        assert!(registry.validate().is_ok());
    }

    #[tokio::test]
    async fn test_resolve_flows_reads_configured_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flows.toml");
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let config = AppConfig {
            flows_path: Some(PathBuf::from(&path)),
            ..AppConfig::default()
        };
        let registry = resolve_flows(&config).await.unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_rendered_builtin_table_loads_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flows.toml");
        let rendered = render_flow_file(&FlowRegistry::builtin()).unwrap();
        tokio::fs::write(&path, rendered).await.unwrap();

        let registry = load_flow_file(&path).await.unwrap();
        assert!(registry.validate().is_ok());
        assert_eq!(
            registry.lookup(&StateId::welcome()).unwrap(),
            FlowRegistry::builtin().lookup(&StateId::welcome()).unwrap()
        );
    }
}
