//! Catalog page: filter sidebar, sort, paginated results.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::warn;
use vm_api_types::{ItemId, ItemPage};
use vm_client::{ApiClient, Sequencer, Transport, query_param};

use crate::cards::{FilterOption, ProductCard, product_cards};
use crate::cart::{self, CartAdd};
use crate::compare;
use crate::filters::{FilterState, SortOption};
use crate::notify::Notification;
use crate::pagination::PageWindow;

/// The backend has no brand listing, so the sidebar offers a fixed set.
pub const BRANDS: [(u64, &str, u64); 5] = [
    (1, "Apple", 42),
    (2, "Samsung", 38),
    (3, "Xiaomi", 25),
    (4, "Lenovo", 18),
    (5, "Sony", 15),
];

pub const LOAD_ERROR: &str = "Could not load products";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogResults {
    pub cards: Vec<ProductCard>,
    pub count_label: String,
    pub pagination: PageWindow,
}

impl CatalogResults {
    fn from_page(page: &ItemPage) -> Self {
        Self {
            cards: product_cards(&page.items),
            count_label: format!("Found {} items", page.pagination.total),
            pagination: PageWindow::from_pagination(&page.pagination),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
    Results(CatalogResults),
    Failed { message: String },
}

pub struct CatalogController<T> {
    client: Rc<ApiClient<T>>,
    filters: RefCell<FilterState>,
    total_pages: Cell<u32>,
    products: Sequencer,
}

impl<T: Transport> CatalogController<T> {
    pub fn new(client: Rc<ApiClient<T>>) -> Self {
        Self::with_filters(client, FilterState::default())
    }

    /// Seed the filters from the page URL: `?category=<id>` pre-selects a
    /// category and `?search=<text>` restricts results.
    pub fn from_page_query(client: Rc<ApiClient<T>>, search: &str) -> Self {
        let mut filters = FilterState::default();
        if let Some(id) = query_param(search, "category").and_then(|id| id.trim().parse::<u64>().ok()) {
            filters.category_ids.push(id);
        }
        filters.search = query_param(search, "search")
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Self::with_filters(client, filters)
    }

    /// Start from an explicit filter set.
    pub fn with_filters(client: Rc<ApiClient<T>>, filters: FilterState) -> Self {
        Self {
            client,
            filters: RefCell::new(filters),
            total_pages: Cell::new(1),
            products: Sequencer::new(),
        }
    }

    pub fn filters(&self) -> FilterState {
        self.filters.borrow().clone()
    }

    /// Current value for the sort select.
    pub fn sort_value(&self) -> String {
        self.filters.borrow().sort.to_string()
    }

    /// Category checkboxes labelled `name (count)`. Empty when the request
    /// fails.
    pub async fn category_options(&self) -> Vec<FilterOption> {
        let categories = match self.client.categories().await {
            Ok(categories) => categories,
            Err(err) => {
                warn!(error = %err, "failed to load categories");
                return Vec::new();
            }
        };
        let selected = self.filters.borrow().category_ids.clone();
        categories
            .iter()
            .map(|category| FilterOption {
                checked: selected.contains(&category.id),
                ..FilterOption::new(category.id, &category.name, category.item_count)
            })
            .collect()
    }

    pub fn brand_options(&self) -> Vec<FilterOption> {
        let filters = self.filters.borrow();
        BRANDS
            .iter()
            .map(|(id, name, count)| FilterOption {
                checked: filters.brand_ids.contains(id),
                ..FilterOption::new(*id, name, *count)
            })
            .collect()
    }

    /// Fetch the current filter set. `None` means a newer fetch started while
    /// this one was in flight and its response was dropped.
    pub async fn load(&self) -> Option<CatalogView> {
        let ticket = self.products.begin();
        let query = self.filters.borrow().to_query();
        let result = self.client.list_items(&query).await;
        if !self.products.is_current(ticket) {
            return None;
        }
        Some(match result {
            Ok(page) => {
                self.total_pages.set(page.pagination.total_pages);
                CatalogView::Results(CatalogResults::from_page(&page))
            }
            Err(err) => {
                warn!(error = %err, "failed to load products");
                CatalogView::Failed {
                    message: LOAD_ERROR.to_owned(),
                }
            }
        })
    }

    /// Apply a sort select value such as `price_asc`. Unknown values are
    /// ignored.
    pub async fn change_sort(&self, value: &str) -> Option<CatalogView> {
        let sort: SortOption = match value.parse() {
            Ok(sort) => sort,
            Err(err) => {
                warn!(value, error = %err, "ignoring sort value");
                return None;
            }
        };
        self.filters.borrow_mut().set_sort(sort);
        self.load().await
    }

    /// Checked categories and brands plus the in-stock flag; returns to page 1.
    pub async fn apply_selection(
        &self,
        category_ids: Vec<u64>,
        brand_ids: Vec<u64>,
        in_stock: bool,
    ) -> Option<CatalogView> {
        self.filters
            .borrow_mut()
            .set_selection(category_ids, brand_ids, in_stock);
        self.load().await
    }

    /// Store price bounds for the next fetch without fetching.
    pub fn apply_price(&self, min: &str, max: &str) {
        self.filters.borrow_mut().set_price(min, max);
    }

    pub async fn reset(&self) -> Option<CatalogView> {
        *self.filters.borrow_mut() = FilterState::default();
        self.load().await
    }

    /// Whether `go_to_page(page)` would fetch. Callers check this before
    /// showing a loading state.
    pub fn accepts_page(&self, page: u32) -> bool {
        (1..=self.total_pages.get()).contains(&page)
    }

    pub fn accepts_sort(&self, value: &str) -> bool {
        value.parse::<SortOption>().is_ok()
    }

    /// Pages outside `[1, total_pages]` are ignored without a request.
    pub async fn go_to_page(&self, page: u32) -> Option<CatalogView> {
        if !self.accepts_page(page) {
            return None;
        }
        self.filters.borrow_mut().page = page;
        self.load().await
    }

    pub async fn add_to_cart(&self, id: ItemId) -> CartAdd {
        cart::add_item(&self.client, id, 1).await
    }

    pub async fn add_to_comparison(&self, id: ItemId) -> Notification {
        compare::add_to_comparison(&self.client, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use vm_client::testing::{RecordingNavigator, ScriptedTransport, json_response, text_response};
    use vm_client::{ClientConfig, MemoryTokenStore};

    fn controller(transport: &ScriptedTransport, search: &str) -> CatalogController<ScriptedTransport> {
        let client = ApiClient::new(
            ClientConfig::new(Some("http://api.test".into())),
            transport.clone(),
            Rc::new(MemoryTokenStore::with_token("t")),
            Rc::new(RecordingNavigator::default()),
        );
        CatalogController::from_page_query(Rc::new(client), search)
    }

    fn page(names: &[&str], page: u32, total_pages: u32, total: u64) -> Value {
        let items: Vec<Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({"id": i + 1, "name": name, "price": 1000}))
            .collect();
        json!({
            "items": items,
            "pagination": {"page": page, "per_page": 12, "total": total, "total_pages": total_pages}
        })
    }

    fn results(view: Option<CatalogView>) -> CatalogResults {
        match view {
            Some(CatalogView::Results(results)) => results,
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_renders_cards_count_and_window() {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, page(&["A", "B"], 5, 10, 118)));
        let catalog = controller(&transport, "");

        let results = results(catalog.load().await);

        assert_eq!(results.cards.len(), 2);
        assert_eq!(results.count_label, "Found 118 items");
        assert_eq!(results.pagination.pages, vec![3, 4, 5, 6, 7]);
        assert_eq!(
            transport.requests()[0].url,
            "http://api.test/items/?page=1&per_page=12&sort_by=created_at&sort_order=desc"
        );
    }

    #[tokio::test]
    async fn page_query_seeds_category_and_search() {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, page(&[], 1, 0, 0)));
        let catalog = controller(&transport, "?category=3&search=usb%20hub");

        let results = results(catalog.load().await);

        assert!(results.cards.is_empty());
        let url = &transport.requests()[0].url;
        assert!(url.contains("category_id=3"));
        assert!(url.contains("search=usb%20hub"));
    }

    #[tokio::test]
    async fn failure_degrades_to_error_view() {
        let transport = ScriptedTransport::new();
        transport.push(text_response(500, "boom"));
        let catalog = controller(&transport, "");

        assert_eq!(
            catalog.load().await,
            Some(CatalogView::Failed {
                message: LOAD_ERROR.to_owned()
            })
        );
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let transport = ScriptedTransport::new();
        transport.push_delayed(json_response(200, page(&["old"], 1, 1, 1)), 3);
        transport.push(json_response(200, page(&["new"], 1, 1, 1)));
        let catalog = controller(&transport, "");

        let (first, second) = tokio::join!(
            catalog.change_sort("price_asc"),
            catalog.change_sort("name_asc")
        );

        assert_eq!(first, None);
        assert_eq!(results(second).cards[0].name, "new");
    }

    #[tokio::test]
    async fn selection_resets_page_and_sends_ids() {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, page(&["A"], 1, 3, 30)));
        transport.push(json_response(200, page(&["A"], 2, 3, 30)));
        transport.push(json_response(200, page(&["A"], 1, 1, 4)));
        let catalog = controller(&transport, "");

        catalog.load().await;
        catalog.go_to_page(2).await;
        catalog.apply_selection(vec![1, 2], vec![5], true).await;

        let url = &transport.requests()[2].url;
        assert!(url.contains("page=1&"));
        assert!(url.contains("category_id=1%2C2"));
        assert!(url.contains("brand_id=5"));
        assert!(url.contains("in_stock=true"));
    }

    #[tokio::test]
    async fn price_is_stored_until_next_fetch() {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, page(&["A"], 1, 1, 1)));
        let catalog = controller(&transport, "");

        catalog.apply_price("1000", "50000");
        assert!(transport.requests().is_empty());

        catalog.apply_selection(Vec::new(), Vec::new(), false).await;
        let url = &transport.requests()[0].url;
        assert!(url.contains("min_price=1000&max_price=50000"));
    }

    #[tokio::test]
    async fn out_of_range_pages_are_ignored() {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, page(&["A"], 1, 2, 20)));
        let catalog = controller(&transport, "");
        catalog.load().await;

        assert_eq!(catalog.go_to_page(0).await, None);
        assert_eq!(catalog.go_to_page(3).await, None);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn page_and_sort_checks_match_what_would_fetch() {
        let transport = ScriptedTransport::new();
        let catalog = controller(&transport, "");
        transport.push(json_response(200, page(&["A"], 1, 2, 20)));
        catalog.load().await;

        assert!(!catalog.accepts_page(0));
        assert!(catalog.accepts_page(1));
        assert!(catalog.accepts_page(2));
        assert!(!catalog.accepts_page(3));
        assert!(catalog.accepts_sort("price_asc"));
        assert!(!catalog.accepts_sort("popularity"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, page(&["A"], 1, 1, 1)));
        transport.push(json_response(200, page(&["A"], 1, 1, 1)));
        let catalog = controller(&transport, "?search=tv");

        catalog.change_sort("price_asc").await;
        catalog.apply_price("10", "");
        catalog.reset().await;

        assert_eq!(catalog.filters(), FilterState::default());
        assert_eq!(catalog.sort_value(), "created_at_desc");
        assert_eq!(
            transport.requests()[1].url,
            "http://api.test/items/?page=1&per_page=12&sort_by=created_at&sort_order=desc"
        );
    }

    #[tokio::test]
    async fn unknown_sort_value_is_ignored() {
        let transport = ScriptedTransport::new();
        let catalog = controller(&transport, "");

        assert_eq!(catalog.change_sort("popularity").await, None);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn options_reflect_selection() {
        let transport = ScriptedTransport::new();
        transport.push(json_response(
            200,
            json!([{"id": 3, "name": "Laptops", "item_count": 14}, {"id": 4, "name": "TVs"}]),
        ));
        let catalog = controller(&transport, "?category=3");

        let categories = catalog.category_options().await;

        assert_eq!(categories[0].label, "Laptops (14)");
        assert!(categories[0].checked);
        assert_eq!(categories[1].label, "TVs (0)");
        assert!(!categories[1].checked);
        let brands = catalog.brand_options();
        assert_eq!(brands.len(), 5);
        assert_eq!(brands[0].label, "Apple (42)");
    }

    #[tokio::test]
    async fn category_failure_leaves_sidebar_empty() {
        let transport = ScriptedTransport::new();
        transport.push(text_response(500, ""));
        let catalog = controller(&transport, "");

        assert!(catalog.category_options().await.is_empty());
    }
}
