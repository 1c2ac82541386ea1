//! VoltMarket storefront, browser side.
//!
//! Binds the page logic from `vm-storefront` to the DOM. Each page module
//! looks up its elements once, renders the controller's view models and
//! wires listeners.

pub mod api;
pub mod dom;
pub mod events;
pub mod logging;
pub mod notify;
pub mod pages;

use wasm_bindgen::prelude::*;

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    let page = pages::PageKind::current();
    let result = pages::run(page, api::client()).await;
    if let Err(err) = &result {
        tracing::error!(?page, error = ?err, "page failed to start");
    }
    result
}
