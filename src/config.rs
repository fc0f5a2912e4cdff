//! Application Configuration
//!
//! Build-time defaults, overridden at runtime by an optional
//! `window.__EVENTHUB_CONFIG__` object set by the hosting page.
//! The session token lives in `localStorage`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{warn, Level};
use wasm_bindgen::JsValue;

use client_cache::Locale;

const CONFIG_GLOBAL: &str = "__EVENTHUB_CONFIG__";
const SESSION_KEY: &str = "eventhub.session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub realtime_url: Option<String>,
    pub locale: Locale,
    /// Lines kept by the in-app log buffer
    pub log_capacity: usize,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("EVENTHUB_API_URL").unwrap_or("/api/").to_string(),
            realtime_url: option_env!("EVENTHUB_REALTIME_URL").map(str::to_string),
            locale: Locale::default(),
            log_capacity: 500,
            log_level: option_env!("EVENTHUB_LOG_LEVEL").unwrap_or("info").to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults merged with the page-provided override, if any
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).unwrap_or(JsValue::UNDEFINED);
        if value.is_undefined() || value.is_null() {
            return Self::default();
        }
        match serde_wasm_bindgen::from_value(value) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "ignoring malformed page config");
                Self::default()
            }
        }
    }

    pub fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("localStorage unavailable")]
    StorageUnavailable,
    #[error("could not write session: {0}")]
    Write(String),
    #[error("could not encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persisted authentication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn load_session() -> Option<Session> {
    let raw = local_storage()?.get_item(SESSION_KEY).ok()??;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(error = %e, "discarding unreadable session");
            None
        }
    }
}

pub fn save_session(session: &Session) -> Result<(), ConfigError> {
    let storage = local_storage().ok_or(ConfigError::StorageUnavailable)?;
    let raw = serde_json::to_string(session)?;
    storage.set_item(SESSION_KEY, &raw).map_err(|e| ConfigError::Write(format!("{:?}", e)))
}

pub fn clear_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(SESSION_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"api_base_url":"https://hub.example.com/api","locale":"fr"}"#).unwrap();
        assert_eq!(config.api_base_url, "https://hub.example.com/api");
        assert_eq!(config.locale, Locale::Fr);
        assert_eq!(config.log_capacity, AppConfig::default().log_capacity);
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::StorageUnavailable.to_string(), "localStorage unavailable");
        let bad: serde_json::Error = serde_json::from_str::<Session>("{").unwrap_err();
        assert!(ConfigError::from(bad).to_string().starts_with("could not encode session"));
    }

    #[test]
    fn test_log_level_parsing() {
        let mut config = AppConfig::default();
        config.log_level = "debug".into();
        assert_eq!(config.log_level(), Level::DEBUG);
        config.log_level = "chatty".into();
        assert_eq!(config.log_level(), Level::INFO);
    }
}
