//! Backend path table.

use vm_api_types::ItemId;

pub const AUTH_REGISTER: &str = "/auth/register";
pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_LOGOUT: &str = "/auth/logout";
pub const AUTH_ME: &str = "/auth/me";

pub const ITEMS: &str = "/items/";
pub const CATEGORIES: &str = "/categories/";

pub const CART: &str = "/cart/";
pub const CART_ITEMS: &str = "/cart/items";

pub const ORDERS: &str = "/orders/";
pub const COMPARISONS: &str = "/comparisons/";
pub const REVIEWS: &str = "/reviews/";

pub fn item(id: ItemId) -> String {
    format!("/items/{id}")
}

pub fn category(id: u64) -> String {
    format!("/categories/{id}")
}

pub fn cart_item(id: ItemId) -> String {
    format!("/cart/items/{id}")
}

pub fn order(id: u64) -> String {
    format!("/orders/{id}")
}

pub fn comparison(id: u64) -> String {
    format!("/comparisons/{id}")
}

pub fn comparison_items(id: u64) -> String {
    format!("/comparisons/{id}/items")
}

pub fn item_reviews(id: ItemId) -> String {
    format!("/reviews/items/{id}")
}
