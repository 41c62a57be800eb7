use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cloneable cancellation latch polled by long-running searches.
///
/// The engine never installs signal handlers itself; a host that wants to
/// interrupt a search wires one of its own handlers to
/// [`cancel`](CancelToken::cancel). The search loop checks the token once
/// per iteration, always between complete place/remove pairs, so the
/// lattice invariants hold when the search winds down.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
