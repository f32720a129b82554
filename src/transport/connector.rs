//! Connectivity-tracking connector.
//!
//! # Responsibilities
//! - Dial the service on behalf of the gRPC channel
//! - Record dial outcomes in the shared `ConnectivityState`
//! - Mark the channel idle when the established connection drops

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::rt::{Read, ReadBufCursor, Write};
use hyper_util::client::legacy::connect::{Connected, Connection};
use tonic::codegen::http::Uri;
use tower::Service;

use crate::transport::connectivity::ConnectivityState;

/// Wraps a connector and tracks the connectivity of what it dials.
#[derive(Debug, Clone)]
pub struct TrackedConnector<C> {
    inner: C,
    state: ConnectivityState,
}

impl<C> TrackedConnector<C> {
    pub fn new(inner: C, state: ConnectivityState) -> Self {
        Self { inner, state }
    }
}

impl<C> Service<Uri> for TrackedConnector<C>
where
    C: Service<Uri>,
    C::Future: Send + 'static,
    C::Response: Send + 'static,
    C::Error: std::fmt::Display + Send + 'static,
{
    type Response = TrackedIo<C::Response>;
    type Error = C::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let state = self.state.clone();
        state.mark_connecting();
        let connecting = self.inner.call(uri.clone());

        Box::pin(async move {
            match connecting.await {
                Ok(io) => {
                    state.mark_ready();
                    tracing::debug!(uri = %uri, "Connected to service");
                    Ok(TrackedIo { inner: io, state })
                }
                Err(e) => {
                    state.mark_failure();
                    tracing::debug!(uri = %uri, error = %e, "Failed to connect to service");
                    Err(e)
                }
            }
        })
    }
}

/// Connection stream that marks the channel idle when dropped.
#[derive(Debug)]
pub struct TrackedIo<T> {
    inner: T,
    state: ConnectivityState,
}

impl<T> Drop for TrackedIo<T> {
    fn drop(&mut self) {
        self.state.mark_disconnected();
        tracing::trace!("Service connection closed");
    }
}

impl<T: Connection> Connection for TrackedIo<T> {
    fn connected(&self) -> Connected {
        self.inner.connected()
    }
}

impl<T: Read + Unpin> Read for TrackedIo<T> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: ReadBufCursor<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl<T: Write + Unpin> Write for TrackedIo<T> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
    }

    fn poll_write_vectored(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write_vectored(cx, bufs)
    }
}
