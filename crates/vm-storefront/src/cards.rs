//! Card view models shared by the home, catalog and product pages.

use vm_api_types::{Category, Item, ItemId};

use crate::format::format_price;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200/cccccc/666666?text=Item";

pub const CATALOG_PAGE: &str = "catalog.html";
pub const CHECKOUT_PAGE: &str = "checkout.html";

pub fn product_href(id: ItemId) -> String {
    format!("product.html?id={id}")
}

pub fn category_href(id: u64) -> String {
    format!("{CATALOG_PAGE}?category={id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ItemId,
    pub name: String,
    pub href: String,
    pub image_url: String,
    pub brand: String,
    pub price_label: String,
    pub old_price_label: Option<String>,
}

impl From<&Item> for ProductCard {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            href: product_href(item.id),
            image_url: item
                .main_image_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_owned()),
            brand: item.brand.as_ref().map(|b| b.name.clone()).unwrap_or_default(),
            price_label: format_price(item.price),
            old_price_label: item.discount_price.map(format_price),
        }
    }
}

pub fn product_cards(items: &[Item]) -> Vec<ProductCard> {
    items.iter().map(ProductCard::from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCard {
    pub id: u64,
    pub name: String,
    pub href: String,
    pub count_label: String,
}

impl From<&Category> for CategoryCard {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            href: category_href(category.id),
            count_label: format!("{} items", category.item_count),
        }
    }
}

/// A checkbox in the catalog sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub id: u64,
    pub label: String,
    pub checked: bool,
}

impl FilterOption {
    pub fn new(id: u64, name: &str, count: u64) -> Self {
        Self {
            id,
            label: format!("{name} ({count})"),
            checked: false,
        }
    }
}
