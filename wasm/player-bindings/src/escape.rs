//! Window-level Escape listener.

use std::rc::Rc;

use reeftag::{EscapeHook, EscapeRegistration};
use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, Window};

/// Installs a `keydown` listener on the window while a draft is open.
pub struct WindowEscapeHook {
    window: Window,
    on_escape: Rc<dyn Fn()>,
}

impl WindowEscapeHook {
    pub fn new(window: Window, on_escape: impl Fn() + 'static) -> Self {
        Self {
            window,
            on_escape: Rc::new(on_escape),
        }
    }
}

impl EscapeHook for WindowEscapeHook {
    fn install(&self) -> EscapeRegistration {
        let on_escape = self.on_escape.clone();
        let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if event.key() == "Escape" {
                on_escape();
            }
        });

        if let Err(e) = self
            .window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        {
            log::warn!("[PLAYER] Failed to install Escape listener: {:?}", e);
            return EscapeRegistration::inert();
        }
        log::trace!("[PLAYER] Escape listener installed");

        let window = self.window.clone();
        EscapeRegistration::new(move || {
            let _ = window
                .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            // Release can run inside the listener's own invocation; free the
            // closure after the current event has finished.
            wasm_bindgen_futures::spawn_local(async move {
                drop(closure);
            });
        })
    }
}
