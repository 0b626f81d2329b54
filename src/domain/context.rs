// Per-call solve context: deadline and cooperative cancellation

use super::provider::{Error, Result};
use super::value_objects::ProblemFamily;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag checked by running solves at iteration boundaries
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Guard that cancels this token when dropped, unless disarmed first.
    pub fn drop_guard(self) -> CancelOnDrop {
        CancelOnDrop { token: Some(self) }
    }
}

/// Cancels its token on drop
#[derive(Debug)]
pub struct CancelOnDrop {
    token: Option<CancellationToken>,
}

impl CancelOnDrop {
    /// Release the token without cancelling it.
    pub fn disarm(mut self) -> CancellationToken {
        self.token.take().unwrap_or_default()
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

/// Limits applied to a single solve call
#[derive(Debug, Clone, Default)]
pub struct SolveContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl SolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now; a timeout past the clock's range means none.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Fails with `TimedOut` once the deadline has elapsed or the call was cancelled.
    pub fn checkpoint(&self, family: ProblemFamily) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::timed_out(family, "solve was cancelled"));
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(Error::timed_out(family, "deadline elapsed before a definite answer"));
            }
        }
        Ok(())
    }

    /// Checkpoint that only consults the clock every `interval` ticks.
    pub fn ticker(&self, family: ProblemFamily, interval: u32) -> Ticker<'_> {
        Ticker {
            ctx: self,
            family,
            interval: interval.max(1),
            count: 0,
        }
    }
}

/// Amortized checkpoint for hot loops
pub struct Ticker<'a> {
    ctx: &'a SolveContext,
    family: ProblemFamily,
    interval: u32,
    count: u32,
}

impl Ticker<'_> {
    pub fn tick(&mut self) -> Result<()> {
        self.count += 1;
        if self.count >= self.interval {
            self.count = 0;
            self.ctx.checkpoint(self.family)?;
        }
        Ok(())
    }
}
