//! Storefront home page: top-rated items, category tiles, session panel and
//! the cart drawer.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use vm_api_types::{ItemId, ItemQuery, RegisterRequest, SortField, SortOrder, User};
use vm_client::{ApiClient, Sequencer, Transport, encode_component};

use crate::cards::{CATALOG_PAGE, CHECKOUT_PAGE, CategoryCard, ProductCard, product_cards};
use crate::cart::{self, CartAdd, CartMirror, CartView};
use crate::compare;
use crate::notify::Notification;

pub const TOP_RATED_PER_PAGE: u32 = 8;
pub const MAX_CATEGORY_TILES: usize = 6;

/// `catalog.html?search=<text>`, or `None` for blank input.
pub fn search_url(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| format!("{CATALOG_PAGE}?search={}", encode_component(text)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthPanel {
    SignedIn { display_name: String },
    SignedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    Proceed(&'static str),
    Blocked(Notification),
    /// No session; the caller should open the sign-in dialog.
    LoginRequired(Notification),
}

/// Outcome of stepping a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    Updated { quantity: u32 },
    /// The line reached zero and was deleted, or the delete failed.
    Removed(Notification),
    Failed(Notification),
    /// The id is not in the cart mirror; nothing was sent.
    NotInCart,
}

impl QuantityChange {
    /// Updates are silent; removals and failures carry a notification.
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Self::Removed(note) | Self::Failed(note) => Some(note),
            Self::Updated { .. } | Self::NotInCart => None,
        }
    }
}

pub struct HomeController<T> {
    client: Rc<ApiClient<T>>,
    user: RefCell<Option<User>>,
    cart: RefCell<CartMirror>,
    cart_loads: Sequencer,
}

impl<T: Transport> HomeController<T> {
    pub fn new(client: Rc<ApiClient<T>>) -> Self {
        Self {
            client,
            user: RefCell::new(None),
            cart: RefCell::new(CartMirror::default()),
            cart_loads: Sequencer::new(),
        }
    }

    pub fn panel(&self) -> AuthPanel {
        match self.user.borrow().as_ref() {
            Some(user) => AuthPanel::SignedIn {
                display_name: user.display_name().to_owned(),
            },
            None => AuthPanel::SignedOut,
        }
    }

    pub fn cart_view(&self) -> CartView {
        self.cart.borrow().view()
    }

    /// Resolve the current user and, when signed in, load their cart.
    pub async fn check_auth(&self) -> AuthPanel {
        let user = self.client.current_user().await;
        let signed_in = user.is_some();
        *self.user.borrow_mut() = user;
        if signed_in {
            self.load_cart().await;
        }
        self.panel()
    }

    /// `None` when the request failed.
    pub async fn top_rated(&self) -> Option<Vec<ProductCard>> {
        let query = ItemQuery {
            per_page: Some(TOP_RATED_PER_PAGE),
            sort_by: Some(SortField::Rating),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        match self.client.list_items(&query).await {
            Ok(page) => Some(product_cards(&page.items)),
            Err(err) => {
                warn!(error = %err, "failed to load top-rated items");
                None
            }
        }
    }

    pub async fn categories(&self) -> Vec<CategoryCard> {
        match self.client.categories().await {
            Ok(categories) => categories
                .iter()
                .take(MAX_CATEGORY_TILES)
                .map(CategoryCard::from)
                .collect(),
            Err(err) => {
                warn!(error = %err, "failed to load categories");
                Vec::new()
            }
        }
    }

    /// Replace the mirror with the server cart. A failed or overtaken reload
    /// keeps the previous mirror.
    pub async fn load_cart(&self) -> CartView {
        let ticket = self.cart_loads.begin();
        let result = self.client.cart().await;
        if self.cart_loads.is_current(ticket) {
            match result {
                Ok(cart) => *self.cart.borrow_mut() = CartMirror::from_cart(&cart),
                Err(err) => warn!(error = %err, "failed to load cart"),
            }
        }
        self.cart_view()
    }

    pub async fn add_to_cart(&self, id: ItemId) -> CartAdd {
        let outcome = cart::add_item(&self.client, id, 1).await;
        if outcome == CartAdd::Added {
            self.load_cart().await;
        }
        outcome
    }

    pub async fn add_to_comparison(&self, id: ItemId) -> Notification {
        compare::add_to_comparison(&self.client, id).await
    }

    /// Step a line's quantity by `delta`. Reaching zero removes the line.
    pub async fn change_quantity(&self, id: ItemId, delta: i64) -> QuantityChange {
        let Some(current) = self.cart.borrow().get(id).map(|entry| entry.quantity) else {
            return QuantityChange::NotInCart;
        };
        let quantity = current.saturating_add(delta);
        if quantity <= 0 {
            return QuantityChange::Removed(self.remove(id).await);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.client.update_cart_item(id, quantity).await {
            Ok(_) => {
                self.load_cart().await;
                QuantityChange::Updated { quantity }
            }
            Err(_) => QuantityChange::Failed(Notification::error("Could not update the cart")),
        }
    }

    pub async fn remove(&self, id: ItemId) -> Notification {
        match self.client.remove_from_cart(id).await {
            Ok(_) => {
                self.load_cart().await;
                Notification::info("Item removed from cart")
            }
            Err(_) => Notification::error("Could not remove the item"),
        }
    }

    /// Empty the cart after `confirm` agrees. Nothing happens for an empty
    /// mirror or a declined confirmation.
    pub async fn clear(&self, confirm: impl FnOnce() -> bool) -> Option<Notification> {
        if self.cart.borrow().is_empty() || !confirm() {
            return None;
        }
        Some(match self.client.clear_cart().await {
            Ok(_) => {
                self.load_cart().await;
                Notification::info("Cart cleared")
            }
            Err(_) => Notification::error("Could not clear the cart"),
        })
    }

    pub fn checkout(&self) -> Checkout {
        if self.cart.borrow().is_empty() {
            return Checkout::Blocked(Notification::warning("Cart is empty"));
        }
        if !self.client.is_authenticated() {
            return Checkout::LoginRequired(Notification::warning("Please sign in to place an order"));
        }
        Checkout::Proceed(CHECKOUT_PAGE)
    }

    pub async fn login(&self, email: &str, password: &str) -> Notification {
        match self.client.login(email, password).await {
            Ok(_) => {
                self.check_auth().await;
                Notification::success("Signed in successfully")
            }
            Err(_) => Notification::error("Sign-in failed. Check your email and password"),
        }
    }

    /// Register a customer account; success signs the user in.
    pub async fn register(&self, name: &str, email: &str, password: &str, phone: &str) -> Notification {
        let request = RegisterRequest::customer(name, email, password, Some(phone));
        match self.client.register(&request).await {
            Ok(_) => {
                self.check_auth().await;
                Notification::success("Registration successful!")
            }
            Err(_) => Notification::error("Registration failed. The email may already be in use"),
        }
    }

    /// `None` when the backend refused; the session is kept in that case.
    pub async fn logout(&self) -> Option<Notification> {
        if let Err(err) = self.client.logout().await {
            warn!(error = %err, "logout failed");
            return None;
        }
        *self.cart.borrow_mut() = CartMirror::default();
        self.check_auth().await;
        Some(Notification::info("Signed out"))
    }
}
