//! tracklet server library entry.
//!
//! Serves the collector script and its asset directory over HTTP. Consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod ops;
pub mod router;
