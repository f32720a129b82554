//! Serving side of the state query.
//!
//! # Data Flow
//! ```text
//! Service logic → StateReporter::set (reporter.rs)
//! gRPC request  → ServiceBaseServer → StateReporter → GetServiceStateReply
//! ```
//!
//! # Design Decisions
//! - Plaintext HTTP/2 only, matching the client
//! - Serving stops when the shutdown future resolves

pub mod reporter;

use std::future::Future;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

use crate::proto::{ServiceBase, ServiceBaseServer};

pub use reporter::StateReporter;

/// Serve `service` on an already bound listener until `shutdown` resolves.
pub async fn serve<S, F>(
    listener: TcpListener,
    service: S,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    S: ServiceBase,
    F: Future<Output = ()> + Send,
{
    match listener.local_addr() {
        Ok(addr) => tracing::info!(address = %addr, "ServiceBase listening"),
        Err(e) => tracing::warn!(error = %e, "ServiceBase listening on unknown address"),
    }

    tonic::transport::Server::builder()
        .add_service(ServiceBaseServer::new(service))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await?;

    tracing::info!("ServiceBase stopped");
    Ok(())
}
