//! Realtime Bridge
//!
//! The socket client lives in the hosting page. We ask it to join the
//! user's channels with an `eventhub:subscribe` window event, and it hands
//! pushes back as `eventhub:realtime` events whose detail is a
//! `RealtimeEvent` object.

use leptos::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};

use client_cache::{apply_event, channel_name, ChannelKind, EntityId, RealtimeEvent};

use crate::store::AppStore;

const SUBSCRIBE_EVENT: &str = "eventhub:subscribe";
const INCOMING_EVENT: &str = "eventhub:realtime";

#[derive(Debug, Serialize)]
struct SubscribeRequest {
    url: Option<String>,
    channels: Vec<String>,
}

fn dispatch(name: &str, detail: &JsValue) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let init = web_sys::CustomEventInit::new();
    init.set_detail(detail);
    let event = web_sys::CustomEvent::new_with_event_init_dict(name, &init)?;
    window.dispatch_event(&event)?;
    Ok(())
}

/// Ask the page to join every channel of `user_id`
pub fn announce(user_id: &EntityId, url: Option<String>) {
    let request = SubscribeRequest {
        url,
        channels: ChannelKind::ALL.iter().map(|kind| channel_name(user_id, *kind)).collect(),
    };
    let detail = match serde_wasm_bindgen::to_value(&request) {
        Ok(detail) => detail,
        Err(e) => {
            warn!(error = %e, "could not encode subscribe request");
            return;
        }
    };
    match dispatch(SUBSCRIBE_EVENT, &detail) {
        Ok(()) => debug!(channels = ?request.channels, "realtime channels announced"),
        Err(e) => warn!(error = ?e, "realtime subscribe failed"),
    }
}

fn decode(event: &web_sys::Event) -> Option<RealtimeEvent> {
    let custom = event.dyn_ref::<web_sys::CustomEvent>()?;
    match serde_wasm_bindgen::from_value(custom.detail()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(error = %e, "dropping malformed realtime event");
            None
        }
    }
}

/// Fold incoming pushes into the store until the owner is disposed
pub fn listen(store: AppStore) {
    let handle = window_event_listener_untyped(INCOMING_EVENT, move |event| {
        let Some(event) = decode(&event) else { return };
        let mut guard = store.write();
        let state = &mut *guard;
        apply_event(&mut state.feed, &mut state.notifications, event);
    });
    on_cleanup(move || handle.remove());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_request_shape() {
        let user = EntityId::server("7");
        let request = SubscribeRequest {
            url: None,
            channels: ChannelKind::ALL.iter().map(|kind| channel_name(&user, *kind)).collect(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["channels"][0], "7-liked-post-channel");
        assert_eq!(json["channels"][2], "7-notification-channel");
        assert!(json["url"].is_null());
    }
}
