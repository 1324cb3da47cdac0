//! HTTP and gRPC servers and shared proto types.
//!
//! This module provides:
//! - Generated protobuf types (`proto`) used by both server and client
//! - Type conversions between native and proto types (`convert`)
//! - The gRPC servicer (`service`, server-only)
//! - The HTTP router, request logging middleware and access log queue
//!   (`http`, `middleware`, `access_log`, `redact`, server-only)
//! - Configuration types (`config`, server-only)
//!
//! Both servers are thin adapters over [`PackLookup`](crate::PackLookup);
//! see that type for the behavior they share.

#[cfg(feature = "server")]
pub mod access_log;
#[cfg(feature = "server")]
pub mod config;
pub mod convert;
#[cfg(feature = "server")]
pub mod http;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod redact;
#[cfg(feature = "server")]
pub mod service;

/// Re-exported generated proto types.
pub mod proto {
    tonic::include_proto!("packs.v1");
}

#[cfg(feature = "server")]
pub use http::{AppState, router};
#[cfg(feature = "server")]
pub use service::PackGrpcService;
