//! Browser side of the API client: `fetch` transport, `localStorage` token
//! store and `location` navigation.

use std::rc::Rc;

use async_trait::async_trait;
use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, RequestMode, Response};

use vm_client::{
    ApiClient, ClientConfig, ClientError, HttpRequest, HttpResponse, Navigator, Result, TOKEN_KEY,
    TokenStore, Transport,
};

use crate::dom;

/// `<meta name="voltmarket-api" content="...">` overrides the default backend.
pub const API_META: &str = "voltmarket-api";

pub type Client = ApiClient<FetchTransport>;

pub fn client() -> Rc<Client> {
    Rc::new(ApiClient::new(
        ClientConfig::new(dom::meta_content(API_META)),
        FetchTransport,
        Rc::new(LocalTokenStore),
        Rc::new(LocationNavigator),
    ))
}

fn js_error(context: &str, err: JsValue) -> ClientError {
    ClientError::Transport(format!("{context}: {err:?}"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_mode(RequestMode::Cors);
        if request.include_credentials {
            opts.set_credentials(RequestCredentials::Include);
        }

        let headers = Headers::new().map_err(|e| js_error("headers", e))?;
        for (name, value) in &request.headers {
            headers
                .set(name, value)
                .map_err(|e| ClientError::Encode(format!("header {name}: {e:?}")))?;
        }
        opts.set_headers(&headers);
        if let Some(body) = &request.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let req = Request::new_with_str_and_init(&request.url, &opts)
            .map_err(|e| js_error("request", e))?;
        let resp_value = JsFuture::from(dom::window().fetch_with_request(&req))
            .await
            .map_err(|e| js_error("fetch", e))?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ClientError::Transport("fetch did not return a Response".into()))?;

        let content_type = resp.headers().get("content-type").ok().flatten();
        let text = JsFuture::from(resp.text().map_err(|e| js_error("body", e))?)
            .await
            .map_err(|e| js_error("body", e))?;

        Ok(HttpResponse {
            status: resp.status(),
            status_text: resp.status_text(),
            content_type,
            body: text.as_string().unwrap_or_default(),
        })
    }
}

/// Session token kept in `localStorage` under `access_token`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTokenStore;

impl TokenStore for LocalTokenStore {
    fn load(&self) -> Option<String> {
        LocalStorage::raw().get_item(TOKEN_KEY).ok().flatten()
    }

    fn save(&self, token: &str) {
        if let Err(err) = LocalStorage::raw().set_item(TOKEN_KEY, token) {
            tracing::warn!(error = ?err, "could not persist session token");
        }
    }

    fn clear(&self) {
        LocalStorage::delete(TOKEN_KEY);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, path: &str) {
        if let Err(err) = dom::window().location().set_href(path) {
            tracing::warn!(path, error = ?err, "navigation failed");
        }
    }
}

pub fn navigate(path: &str) {
    LocationNavigator.navigate(path);
}

/// `location.search` of the current page.
pub fn page_query() -> String {
    dom::window().location().search().unwrap_or_default()
}
