//! Click sinks.
//!
//! - [`UmamiSink`] - Umami event API over HTTP
//! - [`NullSink`] - Discards events when tracking is disabled

pub mod null_sink;
pub mod umami_sink;

pub use null_sink::NullSink;
pub use umami_sink::{UmamiConfig, UmamiSink};
