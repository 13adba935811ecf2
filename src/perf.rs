//! Lightweight performance instrumentation.
//!
//! Scopes are free while disabled. Once enabled, each scope reports its
//! elapsed time as a `debug` event on the `mindmark::perf` target, so the
//! timings land wherever the tracing subscriber writes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Scope {
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        tracing::debug!(
            target: "mindmark::perf",
            scope = self.name,
            elapsed_ms = format_args!("{:.2}", self.elapsed_ms()),
        );
    }
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}
