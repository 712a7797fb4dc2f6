//! Bootstrap - configuration and wiring of the engine and the capture job.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use vega_baseline::{BaselineCapture, CaptureConfig, OiBaseline};
use vega_engine::{EngineConfig, Evaluator};
use vega_ports::{BaselineStore, Clock, InstrumentResolver, MarketData, VerdictSink};

use crate::service::AlertService;

/// Whole-service configuration, deserializable from a JSON file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl RunnerConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Wired service: the alert service plus the capture job ready to run.
pub struct ServiceBootstrap {
    pub service: AlertService,
    pub capture: Arc<BaselineCapture>,
    pub baseline: Arc<OiBaseline>,
}

impl ServiceBootstrap {
    /// Wire the engine, the shared baseline and the capture job over the
    /// provided collaborator ports.
    pub fn new(
        market: Arc<dyn MarketData>,
        resolver: Arc<dyn InstrumentResolver>,
        store: Arc<dyn BaselineStore>,
        sink: Arc<dyn VerdictSink>,
        clock: Arc<dyn Clock>,
        config: RunnerConfig,
    ) -> Self {
        let calendar = config.engine.calendar.clone();
        let day = calendar.trading_day(clock.now());
        let baseline = Arc::new(OiBaseline::new(day));

        let evaluator = Arc::new(Evaluator::new(
            Arc::clone(&market),
            Arc::clone(&resolver),
            Arc::clone(&baseline) as Arc<dyn vega_ports::BaselineReader>,
            Arc::clone(&clock),
            config.engine.clone(),
        ));

        let capture = Arc::new(BaselineCapture::new(
            market,
            resolver,
            store,
            Arc::clone(&clock),
            Arc::clone(&baseline),
            calendar,
            config.capture,
        ));

        let service = AlertService::new(evaluator, sink, clock);

        Self {
            service,
            capture,
            baseline,
        }
    }

    /// Start the daily capture loop on its own long-lived task.
    pub fn spawn_capture(&self) -> JoinHandle<()> {
        let capture = Arc::clone(&self.capture);
        tokio::spawn(async move {
            capture.run().await;
        })
    }
}
