use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use web_sys::MessageEvent;

use tilemap_shared::MapCommand;

/// Decode a `message` payload: either a JSON string or a structured-clone object.
pub fn decode_command(data: &JsValue) -> Result<MapCommand, String> {
    if let Some(raw) = data.as_string() {
        return MapCommand::from_json(&raw);
    }
    serde_wasm_bindgen::from_value(data.clone()).map_err(|e| format!("invalid map command: {e}"))
}

struct MessageBinding {
    window: web_sys::Window,
    handler: Closure<dyn Fn(MessageEvent)>,
}

thread_local! {
    static MESSAGE_BINDING: RefCell<Option<MessageBinding>> = const { RefCell::new(None) };
}

/// Listen for provider commands posted to this window. Replaces any earlier binding.
pub fn connect(on_command: impl Fn(MapCommand) + 'static) {
    disconnect();
    let Some(window) = web_sys::window() else {
        return;
    };

    let handler = Closure::<dyn Fn(MessageEvent)>::new(move |e: MessageEvent| {
        match decode_command(&e.data()) {
            Ok(command) => on_command(command),
            Err(err) => web_sys::console::warn_1(&format!("ignoring map message: {err}").into()),
        }
    });

    if window
        .add_event_listener_with_callback("message", handler.as_ref().unchecked_ref())
        .is_ok()
    {
        MESSAGE_BINDING.with(|slot| {
            *slot.borrow_mut() = Some(MessageBinding { window, handler });
        });
    }
}

pub fn disconnect() {
    MESSAGE_BINDING.with(|slot| {
        if let Some(binding) = slot.borrow_mut().take() {
            binding
                .window
                .remove_event_listener_with_callback(
                    "message",
                    binding.handler.as_ref().unchecked_ref(),
                )
                .ok();
        }
    });
}
