//! Vega Runner
//!
//! Service orchestration for the option-alert engine: webhook alert
//! intake, one evaluation task per inbound alert (no queueing), verdict
//! dispatch to the consumer port, and bootstrap wiring for the engine
//! plus the daily baseline capture job.

pub mod alert;
pub mod bootstrap;
pub mod service;

pub use alert::AlertEvent;
pub use bootstrap::{RunnerConfig, ServiceBootstrap};
pub use service::AlertService;
