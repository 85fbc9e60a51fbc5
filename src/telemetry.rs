//! Telemetry hook interface (§5/§6 — out of scope to implement a backend,
//! but the instrumentation seam itself is core).
//!
//! `encode`/`decode` invoke a hook synchronously at the four named program
//! points: `encode.start`/`encode.stop`/`encode.exception` and the decode
//! equivalents. No metrics backend ships with this crate — callers that
//! want one implement [`TelemetryHook`] and pass it in; a call with no hook
//! pays no cost beyond a `None` check.

use std::time::Duration;

/// One of the four named program points a [`TelemetryHook`] is invoked at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TelemetryPoint {
    EncodeStart,
    EncodeStop,
    EncodeException,
    DecodeStart,
    DecodeStop,
    DecodeException,
}

/// The payload carried to a [`TelemetryHook`] at each program point.
///
/// `duration` and `size` are `None` at the `*Start` points (nothing to
/// measure yet) and populated at `*Stop`/`*Exception`.
#[derive(Clone, Debug)]
pub struct TelemetryEvent {
    pub point: TelemetryPoint,
    pub duration: Option<Duration>,
    pub size: Option<usize>,
    pub data_type: &'static str,
}

/// A synchronous, stateless-by-default telemetry callback.
///
/// Implementations that need to accumulate state across calls are
/// responsible for their own thread safety — `encode`/`decode` may be
/// invoked concurrently on distinct inputs without coordination (§5).
pub trait TelemetryHook {
    fn on_event(&self, event: &TelemetryEvent);
}

impl<F: Fn(&TelemetryEvent)> TelemetryHook for F {
    fn on_event(&self, event: &TelemetryEvent) {
        self(event);
    }
}
