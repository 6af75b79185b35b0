//! The host-side `message` listener on the isolation boundary.

use crate::error::LivePenError;
use livepen_preview::RelayPort;
use log::debug;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, Window};

/// Forwards every window `message` event into a relay port.
///
/// Validation and stale-cycle filtering happen on the receiving side; the
/// listener only converts `event.data` to JSON. Removed from the window on
/// drop.
pub struct MessageBridge {
    window: Window,
    callback: Closure<dyn FnMut(MessageEvent)>,
}

impl MessageBridge {
    pub fn attach(port: RelayPort) -> Result<Self, LivePenError> {
        let window =
            web_sys::window().ok_or_else(|| LivePenError::dom("No window object available"))?;

        let callback = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match serde_wasm_bindgen::from_value::<Value>(event.data()) {
                Ok(payload) => {
                    port.post(payload);
                }
                Err(err) => debug!("Ignoring non-JSON message: {}", err),
            }
        });

        window
            .add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())
            .map_err(|e| LivePenError::from_js("Failed to attach message listener", &e))?;

        Ok(Self { window, callback })
    }
}

impl Drop for MessageBridge {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("message", self.callback.as_ref().unchecked_ref());
    }
}

impl std::fmt::Debug for MessageBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBridge").finish_non_exhaustive()
    }
}
