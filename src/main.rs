//! EventHub Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod logging;
mod markdown;
mod realtime;
mod store;

use app::App;
use leptos::prelude::*;
use tracing::{info, warn};

use config::AppConfig;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load();
    let logs = match logging::init(&config) {
        Ok(buffer) => Some(buffer),
        Err(e) => {
            web_sys::console::warn_1(&format!("logger not installed: {}", e).into());
            None
        }
    };
    info!(api = %config.api_base_url, locale = ?config.locale, "starting EventHub");
    if config.realtime_url.is_none() {
        warn!("no realtime endpoint configured; live updates rely on the page bridge");
    }

    mount_to_body(move || view! { <App config=config logs=logs /> });
}
