//! HTTP API client.
//!
//! Wraps a [`Transport`] for requests to the VoltMarket backend: joins the base
//! URL, injects the bearer token, interprets status and content type, and
//! sends the navigator to the login page on a 401.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, error};
use vm_api_types::{
    Cart, CartItemAdd, CartItemUpdate, Category, Comparison, ComparisonCreate, ComparisonDetail,
    ComparisonItemAdd, Item, ItemId, ItemPage, ItemQuery, LoginRequest, Order, OrderCreate,
    OrderPage, RegisterRequest, ReviewCreate, ReviewPage, User,
};

use crate::config::ClientConfig;
use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::navigator::Navigator;
use crate::query::QueryString;
use crate::session::{Session, TokenStore};
use crate::transport::{HttpRequest, Method, Transport};

const APPLICATION_JSON: &str = "application/json";

/// Decoded success body: JSON when the server declared it, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(v) => Some(v),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.as_json()?.get(name)?.as_str()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.str_field("access_token")
    }

    /// The `status` field of `{"status": "OK"}` acknowledgements.
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ResponseBody::Json(v) => Ok(serde_json::from_value(v)?),
            ResponseBody::Text(t) => Err(ClientError::UnexpectedBody(preview(&t))),
        }
    }
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::Get)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    pub fn put() -> Self {
        Self::new(Method::Put)
    }

    pub fn delete() -> Self {
        Self::new(Method::Delete)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        let encoded = serde_json::to_string(body).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.body = Some(encoded);
        Ok(self)
    }
}

/// Set `name` to `value`, replacing any existing header of the same name.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((name.to_owned(), value));
}

pub struct ApiClient<T> {
    config: ClientConfig,
    transport: T,
    session: Session,
    navigator: Rc<dyn Navigator>,
}

impl<T: Transport> ApiClient<T> {
    /// The stored token is read once, here.
    pub fn new(
        config: ClientConfig,
        transport: T,
        store: Rc<dyn TokenStore>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            transport,
            session: Session::load(store),
            navigator,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Perform a request and return the decoded body. Failures are logged
    /// before they are returned.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<ResponseBody> {
        let method = options.method;
        self.execute(endpoint, options).await.inspect_err(|err| {
            error!(%method, endpoint, error = %err, "API request failed");
        })
    }

    async fn execute(&self, endpoint: &str, options: RequestOptions) -> Result<ResponseBody> {
        let mut headers = vec![("Content-Type".to_owned(), APPLICATION_JSON.to_owned())];
        for (name, value) in options.headers {
            set_header(&mut headers, &name, value);
        }
        if let Some(token) = self.session.token() {
            set_header(&mut headers, "Authorization", format!("Bearer {token}"));
        }

        let request = HttpRequest {
            method: options.method,
            url: format!("{}{}", self.config.base_url, endpoint),
            headers,
            body: options.body,
            include_credentials: true,
        };
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.send(request).await?;

        if !response.ok() {
            if response.status == 401 {
                self.session.clear();
                self.navigator.navigate(&self.config.login_page);
            }
            return Err(ClientError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }

        if response.is_json() {
            Ok(ResponseBody::Json(serde_json::from_str(&response.body)?))
        } else {
            Ok(ResponseBody::Text(response.body))
        }
    }

    async fn fetch<R: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<R> {
        self.request(endpoint, options).await?.decode().inspect_err(|err| {
            error!(endpoint, error = %err, "API response did not match the expected shape");
        })
    }

    // ── Auth ──

    /// Log in; an `access_token` in the response becomes the session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<ResponseBody> {
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let response = self
            .request(endpoints::AUTH_LOGIN, RequestOptions::post().json(&body)?)
            .await?;

        if let Some(token) = response.access_token() {
            self.session.set_token(Some(token));
        }
        Ok(response)
    }

    /// Register; on `{"status": "OK"}` log in with the same credentials and
    /// return the login response instead.
    pub async fn register(&self, user: &RegisterRequest) -> Result<ResponseBody> {
        let response = self
            .request(endpoints::AUTH_REGISTER, RequestOptions::post().json(user)?)
            .await?;

        if response.status() == Some("OK") {
            return self.login(&user.email, &user.password).await;
        }
        Ok(response)
    }

    pub async fn logout(&self) -> Result<ResponseBody> {
        let response = self.request(endpoints::AUTH_LOGOUT, RequestOptions::post()).await?;
        self.session.clear();
        Ok(response)
    }

    /// `None` without a session, or when the lookup fails for any reason.
    pub async fn current_user(&self) -> Option<User> {
        if !self.is_authenticated() {
            return None;
        }
        self.fetch(endpoints::AUTH_ME, RequestOptions::get()).await.ok()
    }

    // ── Catalog ──

    pub async fn list_items(&self, query: &ItemQuery) -> Result<ItemPage> {
        let path = QueryString::new().extend(query.to_pairs()).append_to(endpoints::ITEMS);
        self.fetch(&path, RequestOptions::get()).await
    }

    pub async fn item(&self, id: ItemId) -> Result<Item> {
        self.fetch(&endpoints::item(id), RequestOptions::get()).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.fetch(endpoints::CATEGORIES, RequestOptions::get()).await
    }

    pub async fn category(&self, id: u64) -> Result<Category> {
        self.fetch(&endpoints::category(id), RequestOptions::get()).await
    }

    // ── Cart ──

    pub async fn cart(&self) -> Result<Cart> {
        self.fetch(endpoints::CART, RequestOptions::get()).await
    }

    pub async fn add_to_cart(&self, item_id: ItemId, quantity: u32) -> Result<ResponseBody> {
        let body = CartItemAdd { item_id, quantity };
        self.request(endpoints::CART_ITEMS, RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn update_cart_item(&self, item_id: ItemId, quantity: u32) -> Result<ResponseBody> {
        let body = CartItemUpdate { quantity };
        self.request(&endpoints::cart_item(item_id), RequestOptions::put().json(&body)?)
            .await
    }

    pub async fn remove_from_cart(&self, item_id: ItemId) -> Result<ResponseBody> {
        self.request(&endpoints::cart_item(item_id), RequestOptions::delete())
            .await
    }

    pub async fn clear_cart(&self) -> Result<ResponseBody> {
        self.request(endpoints::CART, RequestOptions::delete()).await
    }

    // ── Orders ──

    pub async fn create_order(&self, order: &OrderCreate) -> Result<ResponseBody> {
        self.request(endpoints::ORDERS, RequestOptions::post().json(order)?)
            .await
    }

    pub async fn orders(&self, page: u32, per_page: u32) -> Result<OrderPage> {
        let path = QueryString::new()
            .push("page", page)
            .push("per_page", per_page)
            .append_to(endpoints::ORDERS);
        self.fetch(&path, RequestOptions::get()).await
    }

    pub async fn order(&self, id: u64) -> Result<Order> {
        self.fetch(&endpoints::order(id), RequestOptions::get()).await
    }

    // ── Comparisons ──

    pub async fn comparisons(&self) -> Result<Vec<Comparison>> {
        self.fetch(endpoints::COMPARISONS, RequestOptions::get()).await
    }

    pub async fn create_comparison(&self, name: &str) -> Result<ResponseBody> {
        let body = ComparisonCreate {
            name: name.to_owned(),
        };
        self.request(endpoints::COMPARISONS, RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn add_to_comparison(&self, comparison_id: u64, item_id: ItemId) -> Result<ResponseBody> {
        let body = ComparisonItemAdd { item_id };
        self.request(
            &endpoints::comparison_items(comparison_id),
            RequestOptions::post().json(&body)?,
        )
        .await
    }

    pub async fn comparison(&self, id: u64) -> Result<ComparisonDetail> {
        self.fetch(&endpoints::comparison(id), RequestOptions::get()).await
    }

    // ── Reviews ──

    pub async fn reviews(&self, item_id: ItemId, page: u32, per_page: u32) -> Result<ReviewPage> {
        let path = QueryString::new()
            .push("page", page)
            .push("per_page", per_page)
            .append_to(&endpoints::item_reviews(item_id));
        self.fetch(&path, RequestOptions::get()).await
    }

    pub async fn create_review(&self, review: &ReviewCreate) -> Result<ResponseBody> {
        self.request(endpoints::REVIEWS, RequestOptions::post().json(review)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;
    use crate::testing::{RecordingNavigator, ScriptedTransport, json_response, text_response};
    use serde_json::json;

    fn client_with(
        transport: &ScriptedTransport,
        store: &MemoryTokenStore,
        navigator: &RecordingNavigator,
    ) -> ApiClient<ScriptedTransport> {
        ApiClient::new(
            ClientConfig::new(Some("http://api.test/".into())),
            transport.clone(),
            Rc::new(store.clone()),
            Rc::new(navigator.clone()),
        )
    }

    #[tokio::test]
    async fn injects_bearer_token_and_default_headers() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"items": [], "pagination": {"page": 1, "per_page": 12, "total": 0, "total_pages": 0}})));
        let store = MemoryTokenStore::with_token("tok-7");
        let client = client_with(&transport, &store, &RecordingNavigator::default());

        client.list_items(&ItemQuery::default()).await?;

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://api.test/items/");
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].header("content-type"), Some("application/json"));
        assert_eq!(sent[0].header("Authorization"), Some("Bearer tok-7"));
        assert!(sent[0].include_credentials);
        Ok(())
    }

    #[tokio::test]
    async fn caller_headers_override_content_type_but_not_authorization() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(text_response(200, "pong"));
        let store = MemoryTokenStore::with_token("tok");
        let client = client_with(&transport, &store, &RecordingNavigator::default());

        let options = RequestOptions::get()
            .header("content-type", "text/plain")
            .header("Authorization", "Basic xyz");
        let body = client.request("/ping", options).await?;

        assert_eq!(body, ResponseBody::Text("pong".into()));
        let sent = transport.requests();
        assert_eq!(sent[0].header("Content-Type"), Some("text/plain"));
        assert_eq!(sent[0].header("authorization"), Some("Bearer tok"));
        assert_eq!(sent[0].headers.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn omits_authorization_without_session() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!([])));
        let client = client_with(&transport, &MemoryTokenStore::default(), &RecordingNavigator::default());

        let categories = client.categories().await?;

        assert!(categories.is_empty());
        assert_eq!(transport.requests()[0].header("Authorization"), None);
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_clears_token_and_redirects_once() {
        let transport = ScriptedTransport::new();
        transport.push(text_response(401, "").with_status_text("Unauthorized"));
        let store = MemoryTokenStore::with_token("stale");
        let navigator = RecordingNavigator::default();
        let client = client_with(&transport, &store, &navigator);

        let err = client.cart().await.unwrap_err();

        assert_eq!(
            err,
            ClientError::Http {
                status: 401,
                status_text: "Unauthorized".into()
            }
        );
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
        assert!(!client.is_authenticated());
        assert_eq!(store.load(), None);
        assert_eq!(navigator.visits(), vec!["/login.html".to_owned()]);
    }

    #[tokio::test]
    async fn other_failures_keep_session() {
        let transport = ScriptedTransport::new();
        transport.push(text_response(404, "").with_status_text("Not Found"));
        let store = MemoryTokenStore::with_token("tok");
        let navigator = RecordingNavigator::default();
        let client = client_with(&transport, &store, &navigator);

        let err = client.item(ItemId(42)).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(client.is_authenticated());
        assert!(navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let transport = ScriptedTransport::new();
        transport.push_error(ClientError::Transport("connection refused".into()));
        let client = client_with(&transport, &MemoryTokenStore::default(), &RecordingNavigator::default());

        let err = client.categories().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn non_json_success_is_returned_as_text() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(text_response(200, "bye"));
        let store = MemoryTokenStore::with_token("tok");
        let client = client_with(&transport, &store, &RecordingNavigator::default());

        let body = client.logout().await?;

        assert_eq!(body, ResponseBody::Text("bye".into()));
        assert!(!client.is_authenticated());
        assert_eq!(store.load(), None);
        Ok(())
    }

    #[tokio::test]
    async fn login_stores_access_token() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"access_token": "fresh"})));
        let store = MemoryTokenStore::default();
        let client = client_with(&transport, &store, &RecordingNavigator::default());

        let response = client.login("ann@example.com", "secret123").await?;

        assert_eq!(response.access_token(), Some("fresh"));
        assert_eq!(client.session().token().as_deref(), Some("fresh"));
        assert_eq!(store.load().as_deref(), Some("fresh"));
        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://api.test/auth/login");
        assert_eq!(
            serde_json::from_str::<Value>(sent[0].body.as_deref().unwrap_or_default())?,
            json!({"email": "ann@example.com", "password": "secret123"})
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_without_token_leaves_session_empty() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"detail": "check your inbox"})));
        let client = client_with(&transport, &MemoryTokenStore::default(), &RecordingNavigator::default());

        client.login("ann@example.com", "secret123").await?;

        assert!(!client.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn register_ok_logs_in_with_same_credentials() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"status": "OK"})));
        transport.push(json_response(200, json!({"access_token": "after-register"})));
        let client = client_with(&transport, &MemoryTokenStore::default(), &RecordingNavigator::default());

        let user = RegisterRequest::customer("Ann", "ann@example.com", "secret123", None);
        let response = client.register(&user).await?;

        assert_eq!(response.access_token(), Some("after-register"));
        assert!(client.is_authenticated());
        let sent = transport.requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].url, "http://api.test/auth/register");
        assert_eq!(sent[1].url, "http://api.test/auth/login");
        let login_body: Value = serde_json::from_str(sent[1].body.as_deref().unwrap_or_default())?;
        assert_eq!(login_body["email"], "ann@example.com");
        assert_eq!(login_body["password"], "secret123");
        Ok(())
    }

    #[tokio::test]
    async fn register_other_status_returns_raw_response() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"status": "PENDING"})));
        let client = client_with(&transport, &MemoryTokenStore::default(), &RecordingNavigator::default());

        let user = RegisterRequest::customer("Ann", "ann@example.com", "secret123", None);
        let response = client.register(&user).await?;

        assert_eq!(response, ResponseBody::Json(json!({"status": "PENDING"})));
        assert_eq!(transport.requests().len(), 1);
        assert!(!client.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn current_user_skips_network_without_session() {
        let transport = ScriptedTransport::new();
        let client = client_with(&transport, &MemoryTokenStore::default(), &RecordingNavigator::default());

        assert!(client.current_user().await.is_none());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn current_user_swallows_failures() {
        let transport = ScriptedTransport::new();
        transport.push(text_response(500, "").with_status_text("Internal Server Error"));
        let client = client_with(&transport, &MemoryTokenStore::with_token("tok"), &RecordingNavigator::default());

        assert!(client.current_user().await.is_none());
        assert_eq!(transport.requests()[0].url, "http://api.test/auth/me");
    }

    #[tokio::test]
    async fn list_items_encodes_filters() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"items": [], "pagination": {"page": 2, "per_page": 12, "total": 13, "total_pages": 2}})));
        let client = client_with(&transport, &MemoryTokenStore::default(), &RecordingNavigator::default());

        let query = ItemQuery {
            page: Some(2),
            category_ids: vec![3, 5],
            search: Some("usb c".into()),
            ..Default::default()
        };
        let page = client.list_items(&query).await?;

        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(
            transport.requests()[0].url,
            "http://api.test/items/?page=2&category_id=3%2C5&search=usb%20c"
        );
        Ok(())
    }

    #[tokio::test]
    async fn cart_mutations_use_expected_methods_and_paths() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        for _ in 0..4 {
            transport.push(json_response(200, json!({"status": "OK"})));
        }
        let client = client_with(&transport, &MemoryTokenStore::with_token("tok"), &RecordingNavigator::default());

        client.add_to_cart(ItemId(9), 2).await?;
        client.update_cart_item(ItemId(9), 3).await?;
        client.remove_from_cart(ItemId(9)).await?;
        client.clear_cart().await?;

        let sent: Vec<(Method, String, Option<String>)> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.url, r.body))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Method::Post, "http://api.test/cart/items".into(), Some(r#"{"item_id":9,"quantity":2}"#.into())),
                (Method::Put, "http://api.test/cart/items/9".into(), Some(r#"{"quantity":3}"#.into())),
                (Method::Delete, "http://api.test/cart/items/9".into(), None),
                (Method::Delete, "http://api.test/cart/".into(), None),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn reviews_and_orders_carry_paging() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"reviews": [], "total_reviews": 0})));
        transport.push(json_response(200, json!({"orders": []})));
        let client = client_with(&transport, &MemoryTokenStore::with_token("tok"), &RecordingNavigator::default());

        client.reviews(ItemId(4), 1, 10).await?;
        client.orders(2, 5).await?;

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://api.test/reviews/items/4?page=1&per_page=10".to_owned(),
                "http://api.test/orders/?page=2&per_page=5".to_owned(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn comparison_calls_hit_nested_paths() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new();
        transport.push(json_response(200, json!({"status": "OK"})));
        transport.push(json_response(
            200,
            json!({"comparison": {"id": 2, "name": "phones", "items": []}, "items": [], "comparison_table": []}),
        ));
        let client = client_with(&transport, &MemoryTokenStore::with_token("tok"), &RecordingNavigator::default());

        client.add_to_comparison(2, ItemId(11)).await?;
        let detail = client.comparison(2).await?;

        assert_eq!(detail.comparison.name, "phones");
        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://api.test/comparisons/2/items");
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"item_id":11}"#));
        assert_eq!(sent[1].url, "http://api.test/comparisons/2");
        Ok(())
    }

    #[tokio::test]
    async fn text_body_for_typed_call_is_rejected() {
        let transport = ScriptedTransport::new();
        transport.push(text_response(200, "<html>maintenance</html>"));
        let client = client_with(&transport, &MemoryTokenStore::default(), &RecordingNavigator::default());

        let err = client.categories().await.unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedBody(_)));
    }
}
