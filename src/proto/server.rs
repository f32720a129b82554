//! Server adapter for `ServiceBase`.

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tonic::codegen::{http, Body, BoxFuture, Service, StdError};

use crate::proto::{
    GetServiceStateReply, GetServiceStateRequest, GET_SERVICE_STATE_PATH, SERVICE_NAME,
};

/// State query implemented by a service.
#[async_trait]
pub trait ServiceBase: Send + Sync + 'static {
    async fn get_service_state(
        &self,
        request: tonic::Request<GetServiceStateRequest>,
    ) -> Result<tonic::Response<GetServiceStateReply>, tonic::Status>;
}

/// Routes gRPC requests to a [`ServiceBase`] implementation.
#[derive(Debug)]
pub struct ServiceBaseServer<T> {
    inner: Arc<T>,
}

impl<T: ServiceBase> ServiceBaseServer<T> {
    pub fn new(inner: T) -> Self {
        Self::from_arc(Arc::new(inner))
    }

    pub fn from_arc(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

impl<T> Clone for ServiceBaseServer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct GetServiceStateSvc<T>(Arc<T>);

impl<T: ServiceBase> tonic::server::UnaryService<GetServiceStateRequest> for GetServiceStateSvc<T> {
    type Response = GetServiceStateReply;
    type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

    fn call(&mut self, request: tonic::Request<GetServiceStateRequest>) -> Self::Future {
        let inner = Arc::clone(&self.0);
        Box::pin(async move { inner.get_service_state(request).await })
    }
}

impl<T, B> Service<http::Request<B>> for ServiceBaseServer<T>
where
    T: ServiceBase,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<tonic::body::Body>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        match req.uri().path() {
            GET_SERVICE_STATE_PATH => {
                let method = GetServiceStateSvc(Arc::clone(&self.inner));
                Box::pin(async move {
                    let codec = tonic::codec::ProstCodec::default();
                    let mut grpc = tonic::server::Grpc::new(codec);
                    Ok(grpc.unary(method, req).await)
                })
            }
            _ => {
                tracing::debug!(path = %req.uri().path(), "Unimplemented gRPC method");
                Box::pin(async move { Ok(tonic::Status::unimplemented("").into_http()) })
            }
        }
    }
}

impl<T> tonic::server::NamedService for ServiceBaseServer<T> {
    const NAME: &'static str = SERVICE_NAME;
}
