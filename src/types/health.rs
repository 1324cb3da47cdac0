//! Health check payload.

use serde::{Deserialize, Serialize};

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    /// Health payload for this build.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: crate::version::SERVICE_NAME.to_string(),
            version: crate::version::PKG_VERSION.to_string(),
        }
    }
}
