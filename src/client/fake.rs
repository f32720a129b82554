//! Scripted transport for unit tests.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::transport::{ClientResult, Connectivity, StateTransport};

type Reply = Box<dyn Fn(usize) -> ClientResult<i32> + Send + Sync>;

/// Transport whose connectivity is set by the test and whose replies come
/// from a closure of the zero-based call index.
pub struct FakeTransport {
    connectivity: AtomicU8,
    calls: AtomicUsize,
    delay: Duration,
    reply: Reply,
}

impl FakeTransport {
    pub fn new(reply: impl Fn(usize) -> ClientResult<i32> + Send + Sync + 'static) -> Self {
        Self {
            connectivity: AtomicU8::new(Connectivity::Ready as u8),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            reply: Box::new(reply),
        }
    }

    /// Always replies with `ordinal`.
    pub fn reporting(ordinal: i32) -> Self {
        Self::new(move |_| Ok(ordinal))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_connectivity(&self, connectivity: Connectivity) {
        self.connectivity.store(connectivity as u8, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateTransport for FakeTransport {
    fn connectivity(&self) -> Connectivity {
        Connectivity::from(self.connectivity.load(Ordering::SeqCst))
    }

    async fn get_service_state(&self) -> ClientResult<i32> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.reply)(call)
    }
}
