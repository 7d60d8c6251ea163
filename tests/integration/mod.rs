//! Integration test modules for clavier
//!
//! Test categories:
//! - lifecycle: initialize, failover, shutdown, reconfigure
//! - events: outbound playback and inbound device events end to end
//! - timebase: clock arbitration across bound drivers

pub mod lifecycle;
pub mod timebase;
