//! Listener wiring. Closures are leaked with `forget`; pages live as long as
//! the document.

use std::future::Future;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

/// Attach a synchronous listener.
pub fn on<E, F>(target: &EventTarget, event: &str, handler: F)
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let mut handler = handler;
    let cb = Closure::wrap(Box::new(move |ev: Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(Event)>);
    if let Err(err) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        tracing::warn!(event, error = ?err, "could not attach listener");
    }
    cb.forget();
}

/// Attach a listener whose work is async; each event spawns its own task.
pub fn on_async<F, Fut>(target: &EventTarget, event: &str, handler: F)
where
    F: Fn(Event) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    on(target, event, move |ev: Event| {
        wasm_bindgen_futures::spawn_local(handler(ev));
    });
}

/// Async click handler that ignores the event.
macro_rules! on_click_async {
    ($el:expr, $ctx:expr, $handler:expr) => {{
        let ctx = $ctx.clone();
        $crate::events::on_async(&$el, "click", move |_| {
            let ctx = ctx.clone();
            async move { $handler(&ctx).await }
        });
    }};
}

/// Form submit handler; the default navigation is suppressed.
macro_rules! on_submit_async {
    ($el:expr, $ctx:expr, $handler:expr) => {{
        let ctx = $ctx.clone();
        $crate::events::on_async(&$el, "submit", move |ev: web_sys::Event| {
            ev.prevent_default();
            let ctx = ctx.clone();
            async move { $handler(&ctx).await }
        });
    }};
}

pub(crate) use {on_click_async, on_submit_async};
