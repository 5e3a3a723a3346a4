//! Shared tracing setup for MedPortal binaries
//!
//! Library code only emits `tracing` events; binaries call [`init_tracing`]
//! once to install a subscriber.

pub mod config;
pub mod init;

pub use config::InstrumentationConfig;
pub use init::init_tracing;
