//! Shared resource setup.
//!
//! - HTTP client used by the IP resolver and the speed test
//! - Logger (plain or JSON)

mod client;
mod logger;

pub use client::init_client;
pub use logger::init_logger_with;
