//! tracklet core: runtime-free telemetry model and state machines.
//!
//! This crate holds everything about interaction telemetry that does not
//! need a clock, a timer or a socket: records and payload shapes, the
//! keyboard hold tracker, throttle/debounce deadlines, the accumulator with
//! its swap-and-clear, device fingerprinting, activation and the shared
//! error type. Callers pass timestamps in, which keeps every state machine
//! deterministic under test.
//!
//! Panics, `unwrap`, and `expect` are compile-denied outside tests.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

pub mod accumulator;
pub mod device;
pub mod element;
pub mod error;
pub mod keyboard;
pub mod page;
pub mod payload;
pub mod record;
pub mod timing;

/// Shared result type.
pub use error::{Result, TrackletError};
