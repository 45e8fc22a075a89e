//! Progress reporting for the bootstrap loop.
//!
//! The orchestrator notifies a [`ProgressSink`] once per processed
//! replicate, whether it succeeded or was discarded, and polls
//! [`ProgressSink::should_abort`] before starting the next one. Any
//! `Fn(usize, usize)` closure is a sink; [`LogProgress`] reports through the
//! `log` facade; [`NoProgress`] does nothing.

/// Receiver of per-replicate progress.
pub trait ProgressSink {
    /// Called after replicate `current` (1-based) of `total` is processed.
    fn on_replicate(&self, current: usize, total: usize);

    /// Polled before each replicate; `true` stops the test.
    fn should_abort(&self) -> bool {
        false
    }
}

impl<F: Fn(usize, usize)> ProgressSink for F {
    fn on_replicate(&self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Silent sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_replicate(&self, _current: usize, _total: usize) {}
}

/// Logs `info!` roughly every tenth of the run and at completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl LogProgress {
    fn step(total: usize) -> usize {
        (total / 10).max(1)
    }
}

impl ProgressSink for LogProgress {
    fn on_replicate(&self, current: usize, total: usize) {
        if current % Self::step(total) == 0 || current == total {
            log::info!("bootstrap replicate {current}/{total}");
        }
    }
}
