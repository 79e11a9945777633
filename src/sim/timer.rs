//! Named frame-time accumulators
//!
//! Timers count simulated milliseconds, never wall clocks. `tick` consumes
//! whole interval units and reports whether at least one elapsed; a slow
//! frame can cover several units in a single call. Accumulators advance at
//! the end of each frame, so work gated on a timer runs with the frame that
//! crossed the interval.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TimerBank {
    timers: HashMap<&'static str, f32>,
}

impl TimerBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start a named timer at zero
    pub fn start(&mut self, name: &'static str) {
        self.timers.insert(name, 0.0);
    }

    /// Accumulated milliseconds for a timer, if it exists
    pub fn elapsed(&self, name: &str) -> Option<f32> {
        self.timers.get(name).copied()
    }

    /// Advance every known timer by the elapsed frame time
    pub fn advance_all(&mut self, elapsed_ms: f32) {
        for value in self.timers.values_mut() {
            *value += elapsed_ms;
        }
    }

    /// True once `interval_secs` of simulated time has accumulated, keeping
    /// any remainder. Unknown names register themselves at zero.
    /// Callers guarantee a positive interval.
    pub fn tick(&mut self, name: &'static str, interval_secs: f32) -> bool {
        let value = self.timers.entry(name).or_insert(0.0);
        let interval_ms = interval_secs * 1000.0;
        let mut ticked = false;
        while *value > interval_ms {
            *value -= interval_ms;
            ticked = true;
        }
        ticked
    }
}
