use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),
}

// Settings for the activity agent, read once at startup.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub webhook_url: String,
    pub webhook_secret: String,
    pub log_dir: PathBuf,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            webhook_url: require("ACTIVITY_WEBHOOK_URL")?,
            webhook_secret: require("ACTIVITY_WEBHOOK_SECRET")?,
            log_dir: env::var("ACTIVITY_LOG_DIR")
                .unwrap_or_else(|_| "logs".to_string())
                .into(),
            user_name: optional("AGENT_USER_NAME"),
            user_email: optional("AGENT_USER_EMAIL"),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingVar(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
