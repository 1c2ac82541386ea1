//! Toast notifications.

use gloo_timers::callback::Timeout;
use vm_storefront::Notification;

use crate::dom;

const TOAST_MS: u32 = 3000;

/// Show a toast in `#notification`, creating a floating one on pages that do
/// not carry the element. The toast hides itself after three seconds.
pub fn show(note: &Notification) {
    let (el, owned) = match dom::by_id("notification") {
        Some(el) => (el, false),
        None => match dom::document().create_element("div") {
            Ok(el) => {
                if let Some(body) = dom::document().body() {
                    let _ = body.append_child(&el);
                }
                (el, true)
            }
            Err(_) => return,
        },
    };

    el.set_class_name(&format!("notification {}", note.severity));
    dom::set_text(&el, &note.message);
    dom::show(&el, "block");

    Timeout::new(TOAST_MS, move || {
        if owned {
            el.remove();
        } else {
            dom::hide(&el);
        }
    })
    .forget();
}

pub fn show_opt(note: Option<Notification>) {
    if let Some(note) = note {
        show(&note);
    }
}
