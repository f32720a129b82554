//! Client stub for `ServiceBase`.

use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;

use crate::proto::{GetServiceStateReply, GetServiceStateRequest, GET_SERVICE_STATE_PATH};

/// Stub issuing `ServiceBase` calls over a shared channel.
///
/// Cloning the stub clones the channel handle, not the connection.
#[derive(Debug, Clone)]
pub struct ServiceBaseClient {
    inner: tonic::client::Grpc<Channel>,
}

impl ServiceBaseClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    /// Unary `getServiceState`.
    pub async fn get_service_state(
        &mut self,
        request: impl tonic::IntoRequest<GetServiceStateRequest>,
    ) -> Result<tonic::Response<GetServiceStateReply>, tonic::Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| tonic::Status::unavailable(format!("Service was not ready: {e}")))?;
        let codec = tonic::codec::ProstCodec::default();
        let path = PathAndQuery::from_static(GET_SERVICE_STATE_PATH);
        self.inner.unary(request.into_request(), path, codec).await
    }
}
