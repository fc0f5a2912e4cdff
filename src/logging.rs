//! Logging Setup
//!
//! Routes `tracing` output to the browser console through the rolling
//! logger, keeping recent lines for the diagnostics panel.

use rolling_logger::{init_logger, LogBuffer, LogSink, LoggerError};
use tracing::Level;
use wasm_bindgen::JsValue;

use crate::config::AppConfig;

const APP_NAME: &str = "EventHub";

struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&self, level: &Level, line: &str) {
        let line = JsValue::from_str(line);
        match *level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

pub fn init(config: &AppConfig) -> Result<LogBuffer, LoggerError> {
    init_logger(APP_NAME, config.log_capacity, config.log_level(), ConsoleSink)
}
