//! Configuration types for menubot.
//!
//! `AppConfig` represents the top-level `menubot.toml` that controls the
//! HTTP listener, the WhatsApp Cloud API credentials, session expiry and
//! logging. All fields have sensible defaults, so an empty file is valid.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the menubot service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// TOML flow table; the built-in menu is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows_path: Option<PathBuf>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// WhatsApp Cloud API settings.
///
/// Tokens are plain strings here; the infra layer wraps them in
/// `SecretString` before use. `Debug` redacts them.
#[derive(Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Token echoed by Meta during webhook verification.
    #[serde(default)]
    pub verify_token: String,
    /// Bearer token for the Graph API.
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub phone_number_id: String,
    /// When set, every reply is sent to this number instead of the sender.
    #[serde(default)]
    pub recipient_override: String,
    /// App secret used to verify `X-Hub-Signature-256`; verification is
    /// skipped when empty.
    #[serde(default)]
    pub app_secret: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_api_base_url() -> String {
    "https://graph.facebook.com/v17.0".to_string()
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            verify_token: String::new(),
            access_token: String::new(),
            phone_number_id: String::new(),
            recipient_override: String::new(),
            app_secret: String::new(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &str| if s.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("WhatsAppConfig")
            .field("verify_token", &redact(&self.verify_token))
            .field("access_token", &redact(&self.access_token))
            .field("phone_number_id", &self.phone_number_id)
            .field("recipient_override", &self.recipient_override)
            .field("app_secret", &redact(&self.app_secret))
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Session expiry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which a session is forgotten.
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: u32,
    /// Period of the background sweep.
    #[serde(default = "default_cleanup_interval_min")]
    pub cleanup_interval_min: u32,
}

fn default_expiration_hours() -> u32 {
    24
}

fn default_cleanup_interval_min() -> u32 {
    60
}

impl SessionConfig {
    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.expiration_hours) * 3600)
    }

    /// Sweep period, never shorter than one minute.
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.cleanup_interval_min.max(1)) * 60)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiration_hours: default_expiration_hours(),
            cleanup_interval_min: default_cleanup_interval_min(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    /// Export spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            otel: false,
        }
    }
}
