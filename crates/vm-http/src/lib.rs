//! `reqwest` transport for native consumers of the VoltMarket API.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use tracing::warn;
use vm_client::{ClientError, HttpRequest, HttpResponse, Method, Result, Transport};

pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Cookies set by the backend are kept for the lifetime of the client,
    /// the native counterpart of `credentials: include`.
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_else(|err| {
                warn!("falling back to default HTTP client: {}", err);
                reqwest::Client::new()
            });
        Self { http }
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn method(m: Method) -> reqwest::Method {
    match m {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.http.request(method(request.method), &request.url);

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::Encode(format!("header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::Encode(format!("header value for '{name}': {e}")))?;
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use std::net::SocketAddr;

    async fn spawn_backend() -> anyhow::Result<SocketAddr> {
        let app = Router::new()
            .route(
                "/echo",
                post(|headers: HeaderMap, body: String| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_owned();
                    axum::Json(serde_json::json!({ "auth": auth, "body": body }))
                }),
            )
            .route("/plain", get(|| async { "plain text" }))
            .route(
                "/locked",
                get(|| async { StatusCode::UNAUTHORIZED.into_response() }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(addr)
    }

    fn request(method: Method, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: vec![
                ("Content-Type".into(), "application/json".into()),
                ("Authorization".into(), "Bearer tok".into()),
            ],
            body: None,
            include_credentials: true,
        }
    }

    #[tokio::test]
    async fn forwards_headers_and_body() -> anyhow::Result<()> {
        let addr = spawn_backend().await?;
        let transport = ReqwestTransport::new();

        let mut req = request(Method::Post, format!("http://{addr}/echo"));
        req.body = Some(r#"{"q":1}"#.into());
        let response = transport.send(req).await?;

        assert!(response.ok());
        assert!(response.is_json());
        let body: serde_json::Value = serde_json::from_str(&response.body)?;
        assert_eq!(body["auth"], "Bearer tok");
        assert_eq!(body["body"], r#"{"q":1}"#);
        Ok(())
    }

    #[tokio::test]
    async fn reports_content_type_and_status() -> anyhow::Result<()> {
        let addr = spawn_backend().await?;
        let transport = ReqwestTransport::new();

        let plain = transport
            .send(request(Method::Get, format!("http://{addr}/plain")))
            .await?;
        assert!(!plain.is_json());
        assert_eq!(plain.body, "plain text");

        let locked = transport
            .send(request(Method::Get, format!("http://{addr}/locked")))
            .await?;
        assert_eq!(locked.status, 401);
        assert_eq!(locked.status_text, "Unauthorized");
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let transport = ReqwestTransport::new();
        let err = transport
            .send(request(Method::Get, "http://127.0.0.1:1/nothing".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
