//! tracklet collector: drives the core state machines with real time and
//! ships batches over HTTP.
//!
//! The host (a browser bridge, an embedding shell, a replay tool) activates
//! a [`Collector`] for a page and feeds it [`InputEvent`]s through a
//! [`CollectorHandle`]. Button clicks and form submissions flush the
//! accumulated records to the ingestion endpoint.

pub mod bridge;
pub mod clock;
pub mod collector;
pub mod config;
pub mod event;
pub mod pipeline;
pub mod stats;
pub mod transport;

pub use collector::{Backends, Collector, CollectorHandle, PendingCounts};
pub use config::{CollectorConfig, CollectorSection};
pub use event::InputEvent;
pub use pipeline::{Delivery, Transmitter};
pub use stats::StatsSnapshot;
