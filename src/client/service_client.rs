//! [`PackClient`]: typed access to packd over gRPC.
//!
//! All proto ↔ native type conversions are centralized in [`crate::server::convert`].

use tonic::transport::Channel;

use crate::server::proto;
use crate::server::proto::pack_service_client::PackServiceClient;
use crate::types::{Pack, PackSummary};
use crate::{PackError, Result};

/// gRPC client for a remote packd instance.
#[derive(Debug, Clone)]
pub struct PackClient {
    inner: PackServiceClient<Channel>,
}

impl PackClient {
    /// Connect to a packd gRPC endpoint.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = PackClient::connect("http://127.0.0.1:50055").await?;
    /// ```
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        let inner = PackServiceClient::connect(addr.clone())
            .await
            .map_err(|e| PackError::Transport(format!("failed to connect to {addr}: {e}")))?;
        Ok(Self { inner })
    }

    /// Pack metadata, or `None` if the pack is unknown.
    pub async fn get_pack_info(&self, pack_id: &str) -> Result<Option<PackSummary>> {
        let request = proto::PackRequest {
            pack_id: pack_id.to_string(),
        };
        match self.inner.clone().get_pack_info(request).await {
            Ok(response) => PackSummary::try_from(response.into_inner()).map(Some),
            Err(status) if status.code() == tonic::Code::NotFound => Ok(None),
            Err(status) => Err(from_status(status)),
        }
    }

    /// Full pack, or `None` if the pack is unknown.
    pub async fn get_pack_content(&self, pack_id: &str) -> Result<Option<Pack>> {
        let request = proto::PackRequest {
            pack_id: pack_id.to_string(),
        };
        match self.inner.clone().get_pack_content(request).await {
            Ok(response) => Pack::try_from(response.into_inner()).map(Some),
            Err(status) if status.code() == tonic::Code::NotFound => Ok(None),
            Err(status) => Err(from_status(status)),
        }
    }

    /// Whether the catalog holds `pack_id`.
    pub async fn validate_pack_exists(&self, pack_id: &str) -> Result<bool> {
        let request = proto::ValidatePackRequest {
            pack_id: pack_id.to_string(),
            user_id: String::new(),
        };
        let response = self
            .inner
            .clone()
            .validate_pack_exists(request)
            .await
            .map_err(from_status)?
            .into_inner();
        if !response.error.is_empty() {
            return Err(PackError::Rpc {
                code: "ERROR".to_string(),
                message: response.error,
            });
        }
        Ok(response.exists)
    }
}

/// Convert [`tonic::Status`] to [`PackError`].
fn from_status(status: tonic::Status) -> PackError {
    match status.code() {
        tonic::Code::NotFound => PackError::NotFound(status.message().to_string()),
        tonic::Code::InvalidArgument => PackError::InvalidInput(status.message().to_string()),
        tonic::Code::Unavailable => PackError::Transport(status.message().to_string()),
        code => PackError::Rpc {
            code: format!("{code:?}"),
            message: status.message().to_string(),
        },
    }
}
