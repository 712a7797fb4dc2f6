//! Vega Engine
//!
//! The decision core of the option-alert service. For each inbound alert
//! it derives option-chain signals (premium deltas, implied-volatility
//! skew, volume and open-interest behaviour) and classifies the observed
//! premium move as a confirmed directional trend, a fake/unconfirmed
//! move, or sideways noise.
//!
//! Layout mirrors the pipeline:
//! - [`window`]: at-the-money strike and the derived strike windows
//! - [`iv`]: Black-Scholes pricing and the bisection IV root-finder
//! - [`skew`]: per-symbol rolling skew statistics
//! - [`aggregator`]: per-strike signals folded into one [`vega_core::SignalBundle`]
//! - [`classifier`]: the pure flag/trend decision function
//! - [`evaluator`]: per-alert orchestration over the ports

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod evaluator;
pub mod iv;
pub mod skew;
pub mod window;

pub use aggregator::SignalAggregator;
pub use classifier::classify;
pub use config::EngineConfig;
pub use evaluator::{EvaluateError, Evaluation, Evaluator};
pub use skew::SkewTracker;
pub use window::StrikeWindow;
