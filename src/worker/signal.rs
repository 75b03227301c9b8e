//! Phase stop signal

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared one-way flag telling workers that the sampling window is over
///
/// Created lowered for every phase and raised exactly once, by the controller
/// when the window closes or by a worker whose operation failed. There is no
/// way to lower it again; a new phase gets a new signal.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    raised: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Returns true if this call raised it.
    pub fn raise(&self) -> bool {
        !self.raised.swap(true, Ordering::Release)
    }

    /// Polled by workers before every iteration
    #[inline(always)]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}
