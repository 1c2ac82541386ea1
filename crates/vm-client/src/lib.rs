//! VoltMarket REST API client.
//!
//! [`ApiClient`] is the single request primitive shared by every page. It owns
//! the [`Session`] and talks to the backend through a pluggable [`Transport`].

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod navigator;
pub mod query;
pub mod sequence;
pub mod session;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::{ApiClient, RequestOptions, ResponseBody};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use navigator::{Navigator, NoopNavigator};
pub use query::{QueryString, decode_component, encode_component, parse_query, query_param};
pub use sequence::{Sequencer, Ticket};
pub use session::{MemoryTokenStore, Session, TOKEN_KEY, TokenStore};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};
