//! DOM helpers shared by the page modules.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    node_list(document().query_selector_all(selector).ok())
}

pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    node_list(parent.query_selector_all(selector).ok())
}

fn node_list(list: Option<web_sys::NodeList>) -> Vec<Element> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn show(el: &Element, display: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("display", display);
    }
}

pub fn hide(el: &Element) {
    show(el, "none");
}

/// Closest ancestor (or self) of the event target matching `selector`.
pub fn closest(event: &web_sys::Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()?
}

pub fn data_attr(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{name}"))
}

/// `content` of `<meta name="...">`, if present and non-blank.
pub fn meta_content(name: &str) -> Option<String> {
    query(&format!(r#"meta[name="{name}"]"#))?
        .get_attribute("content")
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

pub fn missing(what: &str) -> JsValue {
    JsValue::from_str(&format!("missing element {what}"))
}

macro_rules! get_el {
    ($id:expr) => {
        $crate::dom::by_id($id).ok_or_else(|| $crate::dom::missing(concat!("#", $id)))?
    };
}

macro_rules! get_typed {
    ($ty:ty, $id:expr) => {
        $crate::dom::by_id_typed::<$ty>($id).ok_or_else(|| $crate::dom::missing(concat!("#", $id)))?
    };
}

pub(crate) use {get_el, get_typed};
