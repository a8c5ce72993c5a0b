//! Utility modules: evaluation trace capture.
pub mod devlog;
