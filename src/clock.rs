//! Millisecond ledger over a delay provider
//!
//! There is no wall clock in `no_std`. Every wait the bridge performs goes
//! through [`Clock`], which adds it to a running total; settle windows, poll
//! ceilings and sequence telemetry are all measured on that total.

use embedded_hal::delay::DelayNs;

/// Delay provider that accounts for the time it spends
pub struct Clock<D> {
    delay: D,
    elapsed_ms: u32,
}

impl<D: DelayNs> Clock<D> {
    /// Wrap a delay provider, starting the ledger at zero
    pub const fn new(delay: D) -> Self {
        Self {
            delay,
            elapsed_ms: 0,
        }
    }

    /// Block for `ms` milliseconds and record it
    pub fn delay_ms(&mut self, ms: u32) {
        if ms == 0 {
            return;
        }
        self.delay.delay_ms(ms);
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
    }

    /// Total milliseconds waited so far
    #[must_use]
    pub const fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Milliseconds elapsed since an earlier reading of [`elapsed_ms`](Self::elapsed_ms)
    #[must_use]
    pub const fn since(&self, mark: u32) -> u32 {
        self.elapsed_ms.saturating_sub(mark)
    }

    /// Consume the clock and return the delay provider
    pub fn release(self) -> D {
        self.delay
    }
}
