use std::fmt;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_AIRCALL_BASE_URL: &str = "https://api.aircall.io/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required env var: {0}")]
    Missing(&'static str),

    #[error("Could not read configuration: {0}")]
    Source(#[from] config::ConfigError),
}

/// Raw environment values; every field may be absent or blank here.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    aircall_api_id: String,
    aircall_api_token: String,
    team_cs_id: String,
    team_tech_id: String,
    nina_user_id: String,
    app_basic_user: String,
    app_basic_pass: String,
    aircall_base_url: String,
    bind_addr: String,
}

/**
 * Process-wide settings, read once at startup and never mutated afterwards.
 */
#[derive(Clone)]
pub struct Settings {
    pub aircall_api_id: String,
    pub aircall_api_token: String,
    pub team_cs_id: String,
    pub team_tech_id: String,
    pub nina_user_id: String,
    pub app_basic_user: String,
    pub app_basic_pass: String,
    pub aircall_base_url: String,
    pub bind_addr: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("aircall_api_id", &"<redacted>")
            .field("aircall_api_token", &"<redacted>")
            .field("team_cs_id", &self.team_cs_id)
            .field("team_tech_id", &self.team_tech_id)
            .field("nina_user_id", &self.nina_user_id)
            .field("app_basic_user", &self.app_basic_user)
            .field("app_basic_pass", &"<redacted>")
            .field("aircall_base_url", &self.aircall_base_url)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::default())
    }

    fn from_source(env: config::Environment) -> Result<Self, ConfigError> {
        let raw: RawSettings = config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;

        Ok(Self {
            aircall_api_id: required("AIRCALL_API_ID", &raw.aircall_api_id)?,
            aircall_api_token: required("AIRCALL_API_TOKEN", &raw.aircall_api_token)?,
            team_cs_id: required("TEAM_CS_ID", &raw.team_cs_id)?,
            team_tech_id: required("TEAM_TECH_ID", &raw.team_tech_id)?,
            nina_user_id: required("NINA_USER_ID", &raw.nina_user_id)?,
            app_basic_user: or_default(&raw.app_basic_user, "admin"),
            app_basic_pass: required("APP_BASIC_PASS", &raw.app_basic_pass)?,
            aircall_base_url: or_default(&raw.aircall_base_url, DEFAULT_AIRCALL_BASE_URL),
            bind_addr: or_default(&raw.bind_addr, DEFAULT_BIND_ADDR),
        })
    }
}

fn required(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(value.to_string())
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
pub fn test_settings() -> Settings {
    Settings {
        aircall_api_id: "api-id".to_string(),
        aircall_api_token: "api-token".to_string(),
        team_cs_id: "cs-team".to_string(),
        team_tech_id: "tech-team".to_string(),
        nina_user_id: "nina".to_string(),
        app_basic_user: "admin".to_string(),
        app_basic_pass: "secret".to_string(),
        aircall_base_url: DEFAULT_AIRCALL_BASE_URL.to_string(),
        bind_addr: DEFAULT_BIND_ADDR.to_string(),
    }
}
