pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOGIN_PAGE: &str = "/login.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Where the navigator is sent after a 401.
    pub login_page: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ClientConfig {
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            login_page: DEFAULT_LOGIN_PAGE.to_string(),
        }
    }

    pub fn with_login_page(mut self, login_page: &str) -> Self {
        self.login_page = login_page.to_owned();
        self
    }
}
