//! Server configuration.
//!
//! Configuration comes from a YAML file, environment variables, or `.env`
//! values loaded before startup. Priority: YAML file (when given) >
//! environment variables > defaults.
//!
//! # Example
//! ```rust,no_run
//! use voicebridge::config::ServerConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bind host.
const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
const DEFAULT_PORT: u16 = 8080;

/// Default STUN server.
const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

/// Default system prompt for the voice agent.
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that provides clear and concise information.";

/// Default maximum call duration in seconds.
const DEFAULT_MAX_CALL_DURATION_SECS: u64 = 300;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Voice-AI service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// API key for call creation.
    pub api_key: String,

    /// Base URL for the voice-AI REST API.
    pub base_url: String,

    /// HTTP timeout for call-creation requests, in seconds.
    pub http_timeout_secs: u64,

    /// Model override. The service default is used when unset.
    pub model: Option<String>,

    /// Voice override. The service default is used when unset.
    pub voice: Option<String>,

    /// System prompt for the agent.
    pub system_prompt: String,

    /// Greeting the agent speaks first, when set.
    pub greeting: Option<String>,

    /// Create calls against this agent instead of the default endpoint.
    pub agent_id: Option<String>,

    /// Maximum call duration in seconds.
    pub max_call_duration_secs: u64,

    /// Whether the service records the call.
    pub recording_enabled: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: crate::core::voice::DEFAULT_API_BASE_URL.to_string(),
            http_timeout_secs: 15,
            model: None,
            voice: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            greeting: None,
            agent_id: None,
            max_call_duration_secs: DEFAULT_MAX_CALL_DURATION_SECS,
            recording_enabled: false,
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Comma-separated allowed CORS origins, or `*` for any.
    /// Unset means same-origin only.
    pub cors_allowed_origins: Option<String>,

    /// STUN servers for ICE gathering.
    pub stun_servers: Vec<String>,

    /// Voice-AI service settings.
    pub voice: VoiceSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_allowed_origins: None,
            stun_servers: vec![DEFAULT_STUN_SERVER.to_string()],
            voice: VoiceSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables over defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = env_string("HOST") {
            config.host = host;
        }
        if let Some(port) = env_string("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("invalid PORT value {port:?}")))?;
        }
        config.cors_allowed_origins = env_string("CORS_ALLOWED_ORIGINS");
        if let Some(servers) = env_string("STUN_SERVERS") {
            config.stun_servers = servers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(api_key) = env_string("VOICE_API_KEY") {
            config.voice.api_key = api_key;
        }
        if let Some(base_url) = env_string("VOICE_API_URL") {
            config.voice.base_url = base_url;
        }
        if let Some(timeout) = env_string("VOICE_HTTP_TIMEOUT_SECS") {
            config.voice.http_timeout_secs = timeout.parse().map_err(|_| {
                ConfigError::Invalid(format!("invalid VOICE_HTTP_TIMEOUT_SECS value {timeout:?}"))
            })?;
        }
        config.voice.model = env_string("VOICE_MODEL").or(config.voice.model);
        config.voice.voice = env_string("VOICE_NAME").or(config.voice.voice);
        if let Some(prompt) = env_string("SYSTEM_PROMPT") {
            config.voice.system_prompt = prompt;
        }
        config.voice.greeting = env_string("GREETING_TEXT").or(config.voice.greeting);
        config.voice.agent_id = env_string("VOICE_AGENT_ID").or(config.voice.agent_id);
        if let Some(duration) = env_string("MAX_CALL_DURATION_SECS") {
            config.voice.max_call_duration_secs = duration.parse().map_err(|_| {
                ConfigError::Invalid(format!("invalid MAX_CALL_DURATION_SECS value {duration:?}"))
            })?;
        }
        if let Some(recording) = env_string("RECORDING_ENABLED") {
            config.voice.recording_enabled = parse_bool(&recording).ok_or_else(|| {
                ConfigError::Invalid(format!("invalid RECORDING_ENABLED value {recording:?}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// The socket address string this server binds.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must not be zero".to_string()));
        }
        if self.voice.base_url.is_empty() {
            return Err(ConfigError::Invalid(
                "voice base_url must not be empty".to_string(),
            ));
        }
        if self.voice.max_call_duration_secs == 0 {
            return Err(ConfigError::Invalid(
                "max_call_duration_secs must not be zero".to_string(),
            ));
        }
        if self.voice.api_key.is_empty() {
            tracing::warn!("VOICE_API_KEY is not set; call creation will fail");
        }
        Ok(())
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.stun_servers, vec![DEFAULT_STUN_SERVER.to_string()]);
        assert!(config.voice.api_key.is_empty());
        assert_eq!(config.voice.max_call_duration_secs, 300);
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = r#"
host: 127.0.0.1
port: 9000
voice:
  api_key: test-key
  greeting: "Hello! How can I assist you today?"
  max_call_duration_secs: 120
"#;
        let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.address(), "127.0.0.1:9000");
        assert_eq!(config.voice.api_key, "test-key");
        assert_eq!(config.voice.max_call_duration_secs, 120);
        // Unset fields keep defaults
        assert_eq!(config.voice.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }
}
