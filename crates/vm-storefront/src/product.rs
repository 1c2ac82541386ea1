//! Product detail page: item view, reviews, related items, quantity stepper
//! and review submission.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use vm_api_types::{Item, ItemId, ItemQuery, Review, ReviewCreate, ReviewPage};
use vm_client::{ApiClient, Sequencer, Transport, query_param};

use crate::cards::{ProductCard, category_href, product_cards};
use crate::compare;
use crate::format::{format_date, format_price, format_rating, parse_leading_int};
use crate::notify::Notification;
use crate::stars::StarRating;

pub const RELATED_PER_PAGE: u32 = 4;
pub const REVIEWS_PER_PAGE: u32 = 10;
pub const MIN_REVIEW_CHARS: usize = 10;
pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 99;
pub const NO_DESCRIPTION: &str = "This item has no detailed description yet.";

/// Item id from the page URL (`?id=<n>`).
pub fn product_id_from_query(search: &str) -> Option<ItemId> {
    query_param(search, "id")?.trim().parse().ok()
}

/// Discount badge percentage, `round((1 - price / discount_price) * 100)`.
///
/// The ratio is taken against the discount price, so a discount below the
/// list price yields a negative number (100 → 80 gives -25).
pub fn discount_percent(price: i64, discount_price: i64) -> i64 {
    let ratio = 1.0 - price as f64 / discount_price as f64;
    js_round(ratio * 100.0) as i64
}

/// Halves round toward positive infinity, like `Math.round`.
fn js_round(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceView {
    pub current: String,
    pub old: Option<String>,
    pub discount_badge: Option<String>,
}

impl PriceView {
    fn from_item(item: &Item) -> Self {
        match item.discount_price {
            Some(discount) if discount > 0 && discount < item.price => Self {
                current: format_price(item.price),
                old: Some(format_price(discount)),
                discount_badge: Some(format!("-{}%", discount_percent(item.price, discount))),
            },
            _ => Self {
                current: format_price(item.price),
                old: None,
                discount_badge: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub in_stock: bool,
    pub label: String,
}

impl Availability {
    pub fn from_quantity(quantity: i64) -> Self {
        if quantity > 0 {
            Self {
                in_stock: true,
                label: format!("In stock ({quantity} pcs)"),
            }
        } else {
            Self {
                in_stock: false,
                label: "Out of stock".to_owned(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRow {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSummary {
    pub value: String,
    pub label: String,
    pub review_count: u64,
    pub stars: StarRating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub id: ItemId,
    pub title: String,
    pub document_title: String,
    pub sku: String,
    pub price: PriceView,
    pub availability: Availability,
    pub image_url: Option<String>,
    pub description: String,
    pub specifications: Vec<SpecRow>,
    pub category: Option<Breadcrumb>,
    pub rating: Option<RatingSummary>,
}

impl From<&Item> for ProductView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.name.clone(),
            document_title: format!("{} — VoltMarket", item.name),
            sku: if item.sku.trim().is_empty() {
                "—".to_owned()
            } else {
                item.sku.clone()
            },
            price: PriceView::from_item(item),
            availability: Availability::from_quantity(item.quantity),
            image_url: item.main_image_url.clone().filter(|url| !url.is_empty()),
            description: item
                .description
                .clone()
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
            specifications: item
                .specifications
                .iter()
                .map(|spec| SpecRow {
                    name: spec.specification_type.name.clone(),
                    value: match spec.specification_type.unit.as_deref() {
                        Some(unit) if !unit.is_empty() => format!("{} {unit}", spec.value),
                        _ => spec.value.clone(),
                    },
                })
                .collect(),
            category: item.category.as_ref().map(|category| Breadcrumb {
                name: category.name.clone(),
                href: category_href(category.id),
            }),
            rating: item
                .average_rating
                .filter(|rating| *rating > 0.0)
                .map(|rating| RatingSummary {
                    value: format_rating(rating),
                    label: format!("{} ({} reviews)", format_rating(rating), item.review_count),
                    review_count: item.review_count,
                    stars: StarRating::from_rating(rating),
                }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCard {
    pub author: String,
    pub date: String,
    pub stars: StarRating,
    pub text: String,
}

impl From<&Review> for ReviewCard {
    fn from(review: &Review) -> Self {
        Self {
            author: review.user_name.clone(),
            date: format_date(&review.created_at),
            stars: StarRating::from_rating(f64::from(review.rating)),
            text: review.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewsView {
    pub cards: Vec<ReviewCard>,
    pub total: u64,
}

impl ReviewsView {
    fn from_page(page: &ReviewPage) -> Self {
        Self {
            cards: page.reviews.iter().map(ReviewCard::from).collect(),
            total: page.total_reviews,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Quantity input bounded to `[1, 99]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityStepper(u32);

impl Default for QuantityStepper {
    fn default() -> Self {
        Self(MIN_QUANTITY)
    }
}

impl QuantityStepper {
    /// Read the input's text; unparsable text becomes 1, out-of-range values
    /// are clamped.
    pub fn from_input(raw: &str) -> Self {
        let value = parse_leading_int(raw)
            .unwrap_or(i64::from(MIN_QUANTITY))
            .clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY));
        Self(value as u32)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self((self.0 + 1).min(MAX_QUANTITY))
    }

    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(MIN_QUANTITY))
    }
}

/// Local checks run before a review is sent. Ratings outside 1..=5 count as
/// missing; length is measured in characters after trimming.
pub fn validate_review(item_id: ItemId, rating: u8, text: &str) -> Result<ReviewCreate, Notification> {
    if !(1..=5).contains(&rating) {
        return Err(Notification::warning("Please choose a rating"));
    }
    let description = text.trim();
    if description.chars().count() < MIN_REVIEW_CHARS {
        return Err(Notification::warning("Review must be at least 10 characters"));
    }
    Ok(ReviewCreate {
        item_id,
        rating,
        description: description.to_owned(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductPage {
    Found(ProductView),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewSubmission {
    /// Failed local validation; nothing was sent.
    Rejected(Notification),
    Failed(Notification),
    /// `reviews` is the reloaded list, absent when the reload failed or was
    /// overtaken.
    Submitted {
        notification: Notification,
        reviews: Option<ReviewsView>,
    },
}

impl ReviewSubmission {
    pub fn notification(&self) -> &Notification {
        match self {
            Self::Rejected(n) | Self::Failed(n) => n,
            Self::Submitted { notification, .. } => notification,
        }
    }
}

pub struct ProductController<T> {
    client: Rc<ApiClient<T>>,
    id: ItemId,
    item: RefCell<Option<Item>>,
    reviews: Sequencer,
}

impl<T: Transport> ProductController<T> {
    pub fn new(client: Rc<ApiClient<T>>, id: ItemId) -> Self {
        Self {
            client,
            id,
            item: RefCell::new(None),
            reviews: Sequencer::new(),
        }
    }

    /// `None` when the URL carries no usable id; the page should go back to
    /// the catalog.
    pub fn from_page_query(client: Rc<ApiClient<T>>, search: &str) -> Option<Self> {
        product_id_from_query(search).map(|id| Self::new(client, id))
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub async fn load(&self) -> ProductPage {
        match self.client.item(self.id).await {
            Ok(item) => {
                let view = ProductView::from(&item);
                *self.item.borrow_mut() = Some(item);
                ProductPage::Found(view)
            }
            Err(err) => {
                warn!(id = %self.id, error = %err, "failed to load product");
                ProductPage::NotFound
            }
        }
    }

    /// `None` leaves the current list in place: the request failed or a
    /// newer reload has started.
    pub async fn load_reviews(&self) -> Option<ReviewsView> {
        let ticket = self.reviews.begin();
        let result = self.client.reviews(self.id, 1, REVIEWS_PER_PAGE).await;
        if !self.reviews.is_current(ticket) {
            return None;
        }
        match result {
            Ok(page) => Some(ReviewsView::from_page(&page)),
            Err(err) => {
                warn!(id = %self.id, error = %err, "failed to load reviews");
                None
            }
        }
    }

    /// Up to four other items from the same category. `None` when the item
    /// has no category or the request fails.
    pub async fn related(&self) -> Option<Vec<ProductCard>> {
        let cached = self.item.borrow().as_ref().map(|item| item.category_id);
        let category_id = match cached {
            Some(category_id) => category_id,
            None => match self.client.item(self.id).await {
                Ok(item) => item.category_id,
                Err(err) => {
                    warn!(id = %self.id, error = %err, "failed to load product for related items");
                    return None;
                }
            },
        }?;
        let query = ItemQuery {
            per_page: Some(RELATED_PER_PAGE),
            category_ids: vec![category_id],
            exclude: Some(self.id),
            ..Default::default()
        };
        match self.client.list_items(&query).await {
            Ok(page) => Some(product_cards(&page.items)),
            Err(err) => {
                warn!(id = %self.id, error = %err, "failed to load related items");
                None
            }
        }
    }

    pub async fn add_to_cart(&self, quantity: QuantityStepper) -> Notification {
        self.add_item(self.id, quantity.value()).await
    }

    pub async fn add_related_to_cart(&self, id: ItemId) -> Notification {
        self.add_item(id, 1).await
    }

    async fn add_item(&self, id: ItemId, quantity: u32) -> Notification {
        match self.client.add_to_cart(id, quantity).await {
            Ok(_) => Notification::success("Added to cart"),
            Err(_) => Notification::error("Could not add the item to the cart"),
        }
    }

    pub async fn add_to_comparison(&self) -> Notification {
        compare::add_to_comparison(&self.client, self.id).await
    }

    /// Warning when the review form may not open for a signed-out visitor.
    pub fn open_review_form(&self) -> Option<Notification> {
        (!self.client.is_authenticated())
            .then(|| Notification::warning("Please sign in to write a review"))
    }

    pub async fn submit_review(&self, rating: u8, text: &str) -> ReviewSubmission {
        let review = match validate_review(self.id, rating, text) {
            Ok(review) => review,
            Err(warning) => return ReviewSubmission::Rejected(warning),
        };
        if let Err(err) = self.client.create_review(&review).await {
            warn!(id = %self.id, error = %err, "review submission failed");
            return ReviewSubmission::Failed(Notification::error("Could not submit the review"));
        }
        ReviewSubmission::Submitted {
            notification: Notification::success("Review submitted for moderation"),
            reviews: self.load_reviews().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;
    use serde_json::json;
    use vm_client::testing::{RecordingNavigator, ScriptedTransport, json_response, text_response};
    use vm_client::{ClientConfig, MemoryTokenStore, Method};

    fn controller(transport: &ScriptedTransport, store: MemoryTokenStore) -> ProductController<ScriptedTransport> {
        let client = ApiClient::new(
            ClientConfig::new(Some("http://api.test".into())),
            transport.clone(),
            Rc::new(store),
            Rc::new(RecordingNavigator::default()),
        );
        ProductController::new(Rc::new(client), ItemId(42))
    }

    fn item_json() -> serde_json::Value {
        json!({
            "id": 42,
            "name": "Galaxy S24",
            "sku": "",
            "price": 100,
            "discount_price": 80,
            "quantity": 5,
            "category_id": 2,
            "category": {"id": 2, "name": "Phones"},
            "specifications": [
                {"value": "6.2", "specification_type": {"name": "Screen", "unit": "in"}},
                {"value": "Black", "specification_type": {"name": "Colour"}}
            ],
            "average_rating": 4.46,
            "review_count": 12
        })
    }

    #[test]
    fn discount_formula_is_relative_to_discount_price() {
        assert_eq!(discount_percent(100, 80), -25);
        assert_eq!(discount_percent(89990, 79990), -13);
        assert_eq!(discount_percent(150, 100), -50);
        // -12.5 rounds toward positive infinity
        assert_eq!(discount_percent(1125, 1000), -12);
    }

    #[test]
    fn id_comes_from_query_string() {
        assert_eq!(product_id_from_query("?id=42"), Some(ItemId(42)));
        assert_eq!(product_id_from_query("?ref=home&id=7"), Some(ItemId(7)));
        assert_eq!(product_id_from_query("?id=abc"), None);
        assert_eq!(product_id_from_query(""), None);
    }

    #[test]
    fn view_covers_price_stock_specs_and_rating() -> anyhow::Result<()> {
        let item: Item = serde_json::from_value(item_json())?;
        let view = ProductView::from(&item);

        assert_eq!(view.document_title, "Galaxy S24 — VoltMarket");
        assert_eq!(view.sku, "—");
        assert_eq!(view.price.current, "100 ₽");
        assert_eq!(view.price.old.as_deref(), Some("80 ₽"));
        assert_eq!(view.price.discount_badge.as_deref(), Some("--25%"));
        assert_eq!(view.availability.label, "In stock (5 pcs)");
        assert_eq!(view.description, NO_DESCRIPTION);
        assert_eq!(view.specifications[0].value, "6.2 in");
        assert_eq!(view.specifications[1].value, "Black");
        assert_eq!(view.category.as_ref().map(|c| c.href.as_str()), Some("catalog.html?category=2"));
        let rating = view.rating.expect("rating summary");
        assert_eq!(rating.label, "4.5 (12 reviews)");
        assert_eq!(rating.stars, StarRating { full: 4, half: 0, empty: 1 });
        Ok(())
    }

    #[test]
    fn out_of_stock_without_discount_or_rating() -> anyhow::Result<()> {
        let item: Item = serde_json::from_value(json!({
            "id": 1, "name": "Old TV", "sku": "TV-1", "price": 100, "discount_price": 120,
            "quantity": 0, "average_rating": 0.0
        }))?;
        let view = ProductView::from(&item);

        assert_eq!(view.sku, "TV-1");
        assert!(!view.availability.in_stock);
        assert_eq!(view.availability.label, "Out of stock");
        assert_eq!(view.price.old, None);
        assert_eq!(view.price.discount_badge, None);
        assert_eq!(view.rating, None);
        Ok(())
    }

    #[test]
    fn stepper_stays_within_bounds() {
        let mut qty = QuantityStepper::default();
        qty = qty.decrement();
        assert_eq!(qty.value(), 1);
        for _ in 0..150 {
            qty = qty.increment();
        }
        assert_eq!(qty.value(), 99);
        assert_eq!(QuantityStepper::from_input("500").value(), 99);
        assert_eq!(QuantityStepper::from_input("-3").value(), 1);
        assert_eq!(QuantityStepper::from_input("x").value(), 1);
        assert_eq!(QuantityStepper::from_input("7").value(), 7);
    }

    #[tokio::test]
    async fn invalid_reviews_never_reach_the_network() {
        let transport = ScriptedTransport::new();
        let product = controller(&transport, MemoryTokenStore::with_token("t"));

        let no_rating = product.submit_review(0, "A perfectly fine phone").await;
        let too_short = product.submit_review(5, "  great!   ").await;

        assert_eq!(
            no_rating,
            ReviewSubmission::Rejected(Notification::warning("Please choose a rating"))
        );
        assert_eq!(too_short.notification().severity, Severity::Warning);
        assert!(matches!(too_short, ReviewSubmission::Rejected(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn accepted_review_is_posted_and_list_reloaded() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"status": "OK"})));
        transport.push(json_response(200, json!({
            "reviews": [{"id": 1, "item_id": 42, "user_name": "Ann", "rating": 4,
                         "description": "Solid battery life", "created_at": "2024-03-05T10:00:00"}],
            "average_rating": 4.0,
            "total_reviews": 1
        })));
        let product = controller(&transport, MemoryTokenStore::with_token("t"));

        let outcome = product.submit_review(4, "  Solid battery life ").await;

        let ReviewSubmission::Submitted { notification, reviews } = outcome else {
            panic!("expected submission");
        };
        assert_eq!(notification.severity, Severity::Success);
        let reviews = reviews.expect("reloaded reviews");
        assert_eq!(reviews.cards[0].date, "5 March 2024");
        assert_eq!(reviews.cards[0].stars.full, 4);

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url, "http://api.test/reviews/");
        let body: serde_json::Value = serde_json::from_str(sent[0].body.as_deref().unwrap_or_default())?;
        assert_eq!(body, json!({"item_id": 42, "rating": 4, "description": "Solid battery life"}));
        assert_eq!(sent[1].url, "http://api.test/reviews/items/42?page=1&per_page=10");
        Ok(())
    }

    #[tokio::test]
    async fn review_form_requires_a_session() {
        let transport = ScriptedTransport::new();
        let signed_out = controller(&transport, MemoryTokenStore::default());
        let signed_in = controller(&transport, MemoryTokenStore::with_token("t"));

        assert!(signed_out.open_review_form().is_some());
        assert!(signed_in.open_review_form().is_none());
    }

    #[tokio::test]
    async fn related_items_reuse_loaded_category() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, item_json()));
        transport.push(json_response(200, json!({
            "items": [{"id": 43, "name": "Galaxy A55", "price": 39990}],
            "pagination": {"page": 1, "per_page": 4, "total": 1, "total_pages": 1}
        })));
        let product = controller(&transport, MemoryTokenStore::default());

        assert!(matches!(product.load().await, ProductPage::Found(_)));
        let related = product.related().await.expect("related items");

        assert_eq!(related.len(), 1);
        let sent = transport.requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[1].url,
            "http://api.test/items/?per_page=4&category_id=2&exclude=42"
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_item_renders_not_found() {
        let transport = ScriptedTransport::new();
        transport.push(text_response(404, "").with_status_text("Not Found"));
        let product = controller(&transport, MemoryTokenStore::default());

        assert_eq!(product.load().await, ProductPage::NotFound);
    }

    #[tokio::test]
    async fn empty_review_list_is_reported_as_empty() {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"reviews": [], "total_reviews": 0})));
        let product = controller(&transport, MemoryTokenStore::default());

        let reviews = product.load_reviews().await.expect("reviews view");
        assert!(reviews.is_empty());
    }

    #[tokio::test]
    async fn add_to_cart_sends_stepper_quantity() {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"status": "OK"})));
        transport.push(text_response(500, ""));
        let product = controller(&transport, MemoryTokenStore::with_token("t"));

        let ok = product.add_to_cart(QuantityStepper::from_input("3")).await;
        let failed = product.add_related_to_cart(ItemId(43)).await;

        assert_eq!(ok.severity, Severity::Success);
        assert_eq!(failed.severity, Severity::Error);
        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://api.test/cart/items");
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"item_id":42,"quantity":3}"#));
    }
}
