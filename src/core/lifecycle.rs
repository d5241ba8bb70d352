//! Teardown and staleness guard for in-flight requests
//!
//! A component takes a [`Ticket`] before each request and checks it before
//! writing the response into state. The ticket goes stale when a newer
//! request of the same kind starts or when the component is torn down, so
//! late responses become no-ops.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    generation: AtomicU64,
    torn_down: AtomicBool,
}

/// Shared between a component's clones
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    inner: Arc<Inner>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding any earlier ticket
    pub fn begin(&self) -> Ticket {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            lifecycle: self.clone(),
            generation,
        }
    }

    /// After this, every outstanding and future ticket is stale
    pub fn teardown(&self) {
        self.inner.torn_down.store(true, Ordering::SeqCst);
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.load(Ordering::SeqCst)
    }
}

/// Permission to apply one response
#[derive(Debug)]
pub struct Ticket {
    lifecycle: Lifecycle,
    generation: u64,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        !self.lifecycle.is_torn_down()
            && self.lifecycle.inner.generation.load(Ordering::SeqCst) == self.generation
    }
}

/// Marks a single-flight operation as running; released on drop
#[derive(Debug)]
pub struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    /// `None` if the operation is already running
    pub fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
