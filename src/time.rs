//! Fixed-period tick driver using an accumulator pattern.
//!
//! `draw_web()` calls at ~60fps with variable delta. TickDriver converts
//! wall-clock timestamps into a number of whole tick periods elapsed, so
//! passive production is applied once per period regardless of frame rate.
//!
//! The driver has an explicit `start()` / `stop()` lifecycle. While stopped
//! `update()` never yields ticks, so a stopped driver cannot keep feeding the
//! engine after teardown.

pub struct TickDriver {
    /// Milliseconds per tick period (1000ms = one tick per second).
    period_ms: f64,
    /// Upper bound on ticks produced by a single `update()` call.
    max_catch_up: u32,
    /// Accumulated milliseconds not yet consumed as ticks.
    accumulator: f64,
    /// Timestamp of the last update (ms), None before the first frame.
    last_timestamp: Option<f64>,
    running: bool,
    /// Total ticks produced since creation.
    pub total_ticks: u64,
}

impl TickDriver {
    /// Create a stopped driver with the given period and catch-up clamp.
    pub fn new(period_ms: f64, max_catch_up: u32) -> Self {
        Self {
            period_ms: if period_ms > 0.0 { period_ms } else { 1000.0 },
            max_catch_up: max_catch_up.max(1),
            accumulator: 0.0,
            last_timestamp: None,
            running: false,
            total_ticks: 0,
        }
    }

    /// Begin producing ticks. Calling `start()` on a running driver is a no-op.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.accumulator = 0.0;
        self.last_timestamp = None;
    }

    /// Stop producing ticks. Returns true only for the call that actually
    /// stopped a running driver, so teardown work can key off it.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.accumulator = 0.0;
        self.last_timestamp = None;
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed a timestamp (from `performance.now()` or similar) and return the
    /// number of whole periods elapsed since the previous call.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        if !self.running || !now_ms.is_finite() {
            return 0;
        }
        let max_delta = self.period_ms * self.max_catch_up as f64;
        let delta = match self.last_timestamp {
            // Clamp to avoid a burst of ticks when a backgrounded tab resumes
            Some(prev) => (now_ms - prev).clamp(0.0, max_delta),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = ((self.accumulator / self.period_ms) as u32).min(self.max_catch_up);
        self.accumulator -= ticks as f64 * self.period_ms;
        self.total_ticks += ticks as u64;
        ticks
    }
}
