//! gRPC servicer.
//!
//! Each RPC runs its lookup through [`PackLookup::serve`], so timing, metrics
//! and error logging match the HTTP surface. Only the final mapping from
//! [`Lookup`] to `tonic::Status` lives here.

use async_trait::async_trait;
use tonic::{Request, Response, Status};

use super::proto;
use super::proto::pack_service_server::PackService;
use crate::lookup::{Lookup, PackLookup};
use crate::telemetry::Transport;
use crate::types::APPROVED_STATUS;

/// gRPC method names, used as the `operation` metrics label.
pub const GET_PACK_INFO: &str = "GetPackInfo";
pub const GET_PACK_CONTENT: &str = "GetPackContent";
pub const VALIDATE_PACK_EXISTS: &str = "ValidatePackExists";

/// gRPC service over the shared pack lookups.
#[derive(Debug, Clone)]
pub struct PackGrpcService {
    lookup: PackLookup,
}

impl PackGrpcService {
    /// Create a new service over the given lookups.
    pub fn new(lookup: PackLookup) -> Self {
        Self { lookup }
    }
}

/// Map a finished lookup to a gRPC response or status.
fn into_response<T>(result: Lookup<T>, pack_id: &str) -> Result<Response<T>, Status> {
    match result {
        Lookup::Found(message) => Ok(Response::new(message)),
        Lookup::NotFound => Err(Status::not_found(format!("pack {pack_id} not found"))),
        Lookup::Invalid(reason) => Err(Status::invalid_argument(reason)),
        // Cause is already logged; keep it off the wire.
        Lookup::Internal(_) => Err(Status::internal("internal error")),
    }
}

#[async_trait]
impl PackService for PackGrpcService {
    async fn get_pack_info(
        &self,
        request: Request<proto::PackRequest>,
    ) -> Result<Response<proto::PackInfoResponse>, Status> {
        let pack_id = request.into_inner().pack_id;
        let result = self
            .lookup
            .serve(Transport::Grpc, GET_PACK_INFO, Some(&pack_id), |lookup| {
                lookup
                    .info(&pack_id)
                    .and_then(|summary| proto::PackInfoResponse::try_from(&summary).into())
            });
        into_response(result, &pack_id)
    }

    async fn get_pack_content(
        &self,
        request: Request<proto::PackRequest>,
    ) -> Result<Response<proto::PackContentResponse>, Status> {
        let pack_id = request.into_inner().pack_id;
        let result = self
            .lookup
            .serve(Transport::Grpc, GET_PACK_CONTENT, Some(&pack_id), |lookup| {
                lookup
                    .content(&pack_id)
                    .and_then(|pack| proto::PackContentResponse::try_from(pack.as_ref()).into())
            });
        into_response(result, &pack_id)
    }

    async fn validate_pack_exists(
        &self,
        request: Request<proto::ValidatePackRequest>,
    ) -> Result<Response<proto::ValidatePackResponse>, Status> {
        let pack_id = request.into_inner().pack_id;
        let result = self
            .lookup
            .serve(Transport::Grpc, VALIDATE_PACK_EXISTS, Some(&pack_id), |lookup| {
                lookup.exists(&pack_id).map(|exists| proto::ValidatePackResponse {
                    exists,
                    is_owner: false,
                    status: if exists {
                        APPROVED_STATUS.to_string()
                    } else {
                        String::new()
                    },
                    error: String::new(),
                })
            });
        into_response(result, &pack_id)
    }
}
