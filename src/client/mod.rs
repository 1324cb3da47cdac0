//! Client library for connecting to packd.
//!
//! - [`PackClient`] talks to the gRPC surface (info, content, existence).
//! - [`HttpCatalogClient`] talks to the HTTP surface (listing, health).

mod http_client;
mod service_client;

pub use http_client::HttpCatalogClient;
pub use service_client::PackClient;
