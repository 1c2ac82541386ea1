//! Environment-driven settings, overridable from the command line.

use std::env;

use vm_client::ClientConfig;

use crate::token_file::DEFAULT_TOKEN_FILE;

pub const API_URL_VAR: &str = "VOLTMARKET_API_URL";
pub const TOKEN_FILE_VAR: &str = "VOLTMARKET_TOKEN_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub client: ClientConfig,
    pub token_file: String,
}

impl Settings {
    pub fn resolve(api_url: Option<String>, token_file: Option<String>) -> Self {
        Self::from_sources(api_url, token_file, |name| env::var(name).ok())
    }

    fn from_sources(
        api_url: Option<String>,
        token_file: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let token_file = token_file
            .or_else(|| lookup(TOKEN_FILE_VAR))
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_owned());
        Self {
            client: ClientConfig::new(api_url.or_else(|| lookup(API_URL_VAR))),
            token_file,
        }
    }
}
