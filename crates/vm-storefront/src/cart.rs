//! Local mirror of the server-side cart. The mirror is never edited in place;
//! every mutation is followed by a full reload.

use vm_api_types::{Cart, ItemId};
use vm_client::{ApiClient, Transport};

use crate::format::format_price;
use crate::notify::Notification;

pub const CART_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/60/cccccc/666666?text=Item";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    pub id: ItemId,
    pub title: String,
    pub price: i64,
    pub quantity: i64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartMirror {
    entries: Vec<CartEntry>,
}

impl CartMirror {
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            entries: cart
                .items
                .iter()
                .map(|line| CartEntry {
                    id: line.item_id,
                    title: line.item_name.clone(),
                    price: line.item_price,
                    quantity: line.quantity,
                    image_url: line.item_image_url.clone(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn get(&self, id: ItemId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of quantities, shown on the cart badge.
    pub fn total_count(&self) -> i64 {
        self.entries
            .iter()
            .fold(0i64, |total, entry| total.saturating_add(entry.quantity))
    }

    pub fn total_amount(&self) -> i64 {
        self.entries
            .iter()
            .fold(0i64, |total, entry| {
                total.saturating_add(entry.price.saturating_mul(entry.quantity))
            })
    }

    pub fn view(&self) -> CartView {
        CartView {
            badge_count: self.total_count(),
            lines: self
                .entries
                .iter()
                .map(|entry| CartLineView {
                    id: entry.id,
                    title: entry.title.clone(),
                    image_url: entry
                        .image_url
                        .clone()
                        .filter(|url| !url.is_empty())
                        .unwrap_or_else(|| CART_PLACEHOLDER_IMAGE.to_owned()),
                    quantity: entry.quantity,
                    line_total_label: format_price(entry.price.saturating_mul(entry.quantity)),
                })
                .collect(),
            total_label: format_price(self.total_amount()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: ItemId,
    pub title: String,
    pub image_url: String,
    pub quantity: i64,
    pub line_total_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub badge_count: i64,
    pub lines: Vec<CartLineView>,
    pub total_label: String,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAdd {
    Added,
    /// No session; the caller should open the sign-in dialog.
    LoginRequired,
    Failed,
}

impl CartAdd {
    pub fn notification(&self) -> Notification {
        match self {
            Self::Added => Notification::success("Added to cart"),
            Self::LoginRequired => Notification::warning("Please sign in to add items to the cart"),
            Self::Failed => Notification::error("Could not add the item to the cart"),
        }
    }
}

/// Add `quantity` of an item, refusing locally when there is no session.
pub async fn add_item<T: Transport>(client: &ApiClient<T>, id: ItemId, quantity: u32) -> CartAdd {
    if !client.is_authenticated() {
        return CartAdd::LoginRequired;
    }
    match client.add_to_cart(id, quantity).await {
        Ok(_) => CartAdd::Added,
        Err(_) => CartAdd::Failed,
    }
}
