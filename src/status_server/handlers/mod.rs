//! Server HTTP handlers.

mod metrics;
mod status;
mod verify;

pub use metrics::metrics_handler;
pub use status::{health_handler, status_handler};
pub use verify::verify_handler;
