//! Top-level facade crate for tracklet.
//!
//! Re-exports the core model, the collector runtime and the asset server so
//! users can depend on a single crate.

pub mod core {
    pub use tracklet_core::*;
}

pub mod collector {
    pub use tracklet_collector::*;
}

pub mod server {
    pub use tracklet_server::*;
}
