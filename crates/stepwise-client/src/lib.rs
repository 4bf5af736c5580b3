//! Stepwise Client
//!
//! Exchanges processes and teams with a remote store. The [`Transport`]
//! trait is the seam: [`HttpTransport`] signs requests with a consumer
//! key/secret pair and talks HTTP, while tests plug in an in-memory store.
//!
//! Statistics and search endpoints are not covered.

mod client;
mod config;
mod endpoint;
mod error;
mod http;
mod transport;

pub use client::Client;
pub use config::{API_VERSION, ClientConfig};
pub use endpoint::Endpoint;
pub use error::ClientError;
pub use http::HttpTransport;
pub use transport::{Transport, Verb};
