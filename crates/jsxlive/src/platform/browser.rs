//! Browser bindings: Babel standalone, `localStorage` and `postMessage`.
//!
//! Expects the host page to have loaded `@babel/standalone`, which exposes a
//! global `Babel` object.

use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use jsxlive_protocol::PreviewRequest;

use crate::bundle::{Transform, TransformOptions};
use crate::error::{StorageError, TransformError};
use crate::storage::KeyValueStorage;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = Babel, js_name = transform)]
    fn babel_transform(source: &str, options: &JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no window available")]
    NoWindow,
    #[error("{0}")]
    Js(String),
}

/// Message of a thrown JS value: `error.message`, or the value itself.
fn js_error_message(value: &JsValue) -> String {
    js_sys::Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .filter(|message| !message.is_empty())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Calls `Babel.transform(source, { presets })`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BabelTransform;

impl Transform for BabelTransform {
    fn transform(&self, source: &str, options: &TransformOptions) -> Result<String, TransformError> {
        let presets: js_sys::Array = options
            .presets
            .iter()
            .map(|preset| JsValue::from_str(preset))
            .collect();
        let babel_options = js_sys::Object::new();
        js_sys::Reflect::set(&babel_options, &JsValue::from_str("presets"), &presets)
            .map_err(|error| TransformError::new(js_error_message(&error)))?;

        let result = babel_transform(source, &babel_options)
            .map_err(|error| TransformError::new(js_error_message(&error)))?;
        js_sys::Reflect::get(&result, &JsValue::from_str("code"))
            .ok()
            .and_then(|code| code.as_string())
            .ok_or_else(|| TransformError::new("Babel returned no code"))
    }
}

/// `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn new() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(|error| StorageError::Backend(js_error_message(&error)))?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|error| StorageError::Backend(js_error_message(&error)))
    }

    fn insert(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Throws when the quota is exceeded
        self.storage
            .set_item(key, value)
            .map_err(|error| StorageError::Backend(js_error_message(&error)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|error| StorageError::Backend(js_error_message(&error)))
    }
}

/// Listens for `message` events on the host window until dropped.
///
/// Message data is converted to JSON before reaching the callback; values that
/// have no JSON shape (functions, transferables) are skipped.
pub struct MessageListener {
    window: web_sys::Window,
    closure: Closure<dyn FnMut(web_sys::MessageEvent)>,
}

impl MessageListener {
    pub fn new(mut on_message: impl FnMut(serde_json::Value) + 'static) -> Result<Self, BridgeError> {
        let window = web_sys::window().ok_or(BridgeError::NoWindow)?;
        let closure = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(
            move |event: web_sys::MessageEvent| {
                match serde_wasm_bindgen::from_value::<serde_json::Value>(event.data()) {
                    Ok(data) => on_message(data),
                    Err(error) => log::debug!("Skipping message without JSON shape: {error}"),
                }
            },
        );
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .map_err(|error| BridgeError::Js(js_error_message(&error)))?;
        Ok(Self { window, closure })
    }
}

impl Drop for MessageListener {
    fn drop(&mut self) {
        if let Err(error) = self
            .window
            .remove_event_listener_with_callback("message", self.closure.as_ref().unchecked_ref())
        {
            log::error!(
                "Failed to remove message listener: {}",
                js_error_message(&error)
            );
        }
    }
}

/// Posts `{ type: "request-logs" }` into a loaded preview frame.
pub fn request_console(frame: &web_sys::HtmlIFrameElement) -> Result<(), BridgeError> {
    let frame_window = frame.content_window().ok_or(BridgeError::NoWindow)?;
    let request = PreviewRequest::RequestLogs
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|error| BridgeError::Js(error.to_string()))?;
    frame_window
        .post_message(&request, "*")
        .map_err(|error| BridgeError::Js(js_error_message(&error)))
}
