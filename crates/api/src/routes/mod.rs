//! HTTP Routes

pub mod metrics;
pub mod status;
