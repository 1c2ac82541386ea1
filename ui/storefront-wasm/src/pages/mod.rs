//! One module per storefront page. The page is picked from the `data-page`
//! attribute on `<body>`.

pub mod catalog;
pub mod home;
pub mod product;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::api::Client;
use crate::dom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Catalog,
    Product,
}

impl PageKind {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "home" | "index" => Some(Self::Home),
            "catalog" => Some(Self::Catalog),
            "product" => Some(Self::Product),
            _ => None,
        }
    }

    /// Current document's page, defaulting to home.
    pub fn current() -> Self {
        dom::document()
            .body()
            .and_then(|body| body.get_attribute("data-page"))
            .and_then(|value| Self::from_attr(&value))
            .unwrap_or(Self::Home)
    }
}

pub async fn run(kind: PageKind, client: Rc<Client>) -> Result<(), JsValue> {
    tracing::debug!(?kind, "starting page");
    match kind {
        PageKind::Home => home::start(client).await,
        PageKind::Catalog => catalog::start(client).await,
        PageKind::Product => product::start(client).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_attribute_maps_to_kind() {
        assert_eq!(PageKind::from_attr("catalog"), Some(PageKind::Catalog));
        assert_eq!(PageKind::from_attr(" product "), Some(PageKind::Product));
        assert_eq!(PageKind::from_attr("index"), Some(PageKind::Home));
        assert_eq!(PageKind::from_attr("checkout"), None);
    }
}
