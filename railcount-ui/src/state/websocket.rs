//! WebSocket Client
//!
//! Follows the counter's `/ws` event stream and feeds every frame into the
//! shared live pipeline. Reconnects with exponential backoff.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::global::GlobalState;

const INITIAL_BACKOFF_MS: u32 = 1000;
const MAX_BACKOFF_MS: u32 = 30000;
const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Delay before reconnect `attempt` (0-based)
pub fn backoff_ms(attempt: u32) -> u32 {
    2_u32
        .checked_pow(attempt)
        .and_then(|factor| factor.checked_mul(INITIAL_BACKOFF_MS))
        .unwrap_or(MAX_BACKOFF_MS)
        .min(MAX_BACKOFF_MS)
}

/// WebSocket client for the live event stream
#[derive(Clone)]
pub struct WebSocketClient {
    ws: Rc<RefCell<Option<WebSocket>>>,
    url: String,
    reconnect_attempts: Rc<RefCell<u32>>,
}

impl WebSocketClient {
    /// Create a new WebSocket client
    pub fn new(url: &str) -> Self {
        Self {
            ws: Rc::new(RefCell::new(None)),
            url: url.to_string(),
            reconnect_attempts: Rc::new(RefCell::new(0)),
        }
    }

    /// Connect to the WebSocket server
    pub fn connect(&self, state: GlobalState) {
        match WebSocket::new(&self.url) {
            Ok(ws) => {
                self.setup_handlers(&ws, state);
                *self.ws.borrow_mut() = Some(ws);
            }
            Err(e) => {
                web_sys::console::error_1(&format!("WebSocket connection failed: {:?}", e).into());
                self.schedule_reconnect(state);
            }
        }
    }

    /// Set up WebSocket event handlers
    fn setup_handlers(&self, ws: &WebSocket, state: GlobalState) {
        // On open
        let reconnect_attempts = Rc::clone(&self.reconnect_attempts);
        let on_open = Closure::wrap(Box::new(move |_: JsValue| {
            web_sys::console::log_1(&"WebSocket connected".into());
            state.ws_connected.set(true);
            *reconnect_attempts.borrow_mut() = 0;
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        // On message
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            match event.data().dyn_into::<js_sys::JsString>() {
                Ok(text) => {
                    let text: String = text.into();
                    state.handle_frame(&text);
                }
                Err(_) => {
                    web_sys::console::warn_1(&"Dropping binary frame".into());
                    state.reject_frame();
                }
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        // On close
        let client = self.clone();
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            web_sys::console::log_1(
                &format!("WebSocket closed: code={}, reason={}", event.code(), event.reason()).into(),
            );
            state.ws_connected.set(false);
            client.schedule_reconnect(state);
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        // On error
        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_1(&format!("WebSocket error: {:?}", e).into());
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }

    /// Schedule a reconnect attempt
    fn schedule_reconnect(&self, state: GlobalState) {
        let attempts = *self.reconnect_attempts.borrow();
        if attempts >= MAX_RECONNECT_ATTEMPTS {
            web_sys::console::error_1(&"Max reconnect attempts reached".into());
            state.show_error("Live stream lost; reload the page to reconnect");
            return;
        }

        let delay = backoff_ms(attempts);
        *self.reconnect_attempts.borrow_mut() = attempts + 1;

        let client = self.clone();
        gloo_timers::callback::Timeout::new(delay, move || {
            web_sys::console::log_1(
                &format!("Attempting reconnect (attempt {})", client.reconnect_attempts.borrow()).into(),
            );
            client.connect(state);
        })
        .forget();
    }

    /// Close the connection
    pub fn close(&self) {
        if let Some(ws) = self.ws.borrow().as_ref() {
            let _ = ws.close();
        }
    }
}

/// Initialize the stream connection (call from app root)
pub fn init_websocket(state: GlobalState, api_base: &str) -> WebSocketClient {
    let client = WebSocketClient::new(&crate::api::ws_url(api_base, "/ws"));
    client.connect(state);
    client
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(backoff_ms(0), 1000);
        assert_eq!(backoff_ms(3), 8000);
        assert_eq!(backoff_ms(5), 30000);
        assert_eq!(backoff_ms(40), 30000);
    }
}
