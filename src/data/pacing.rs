//! Request pacing.
//!
//! The provider publishes no rate limit, so long runs back off proactively:
//! callers `tick()` their throttle after each unit of work and the policy
//! decides when to sleep. No reaction to rate-limit errors happens here.

use std::time::Duration;

pub trait Throttle {
    /// Record one completed unit of work, sleeping if the policy says so.
    fn tick(&mut self);

    /// Start a new batch count, e.g. when the next baseline begins.
    fn restart(&mut self) {}
}

/// Sleep for `pause` after every `every` ticks.
#[derive(Debug, Clone)]
pub struct BatchPause {
    every: usize,
    pause: Duration,
    count: usize,
    label: &'static str,
}

impl BatchPause {
    /// `every = 0` or a zero `pause` disables sleeping (ticks are still counted).
    pub fn new(every: usize, pause: Duration, label: &'static str) -> Self {
        Self {
            every,
            pause,
            count: 0,
            label,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Advance the counter; returns `true` when a pause is due.
    fn advance(&mut self) -> bool {
        self.count += 1;
        self.every > 0 && !self.pause.is_zero() && self.count % self.every == 0
    }
}

impl Throttle for BatchPause {
    fn tick(&mut self) {
        if self.advance() {
            log::info!(
                "{} {} done, pausing for {}s",
                self.count,
                self.label,
                self.pause.as_secs_f64()
            );
            std::thread::sleep(self.pause);
            log::info!("Resumed after {} {}", self.count, self.label);
        }
    }

    fn restart(&mut self) {
        self.count = 0;
    }
}

/// Never sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

impl Throttle for NoPause {
    fn tick(&mut self) {}
}
