//! Per-alert evaluation service.

use std::sync::Arc;

use log::{error, info};
use tokio::task::JoinHandle;
use vega_core::AlertRecord;
use vega_engine::{Evaluation, Evaluator};
use vega_ports::{Clock, VerdictSink};

use crate::alert::AlertEvent;

/// Accepts inbound alerts and runs one evaluation task per alert.
///
/// There is no queue: each alert gets its own task, and concurrent
/// evaluations for different symbols proceed independently.
pub struct AlertService {
    evaluator: Arc<Evaluator>,
    sink: Arc<dyn VerdictSink>,
    clock: Arc<dyn Clock>,
}

impl AlertService {
    pub fn new(
        evaluator: Arc<Evaluator>,
        sink: Arc<dyn VerdictSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            evaluator,
            sink,
            clock,
        }
    }

    /// Spawn the evaluation of one inbound alert.
    pub fn handle(&self, event: AlertEvent) -> JoinHandle<()> {
        let evaluator = Arc::clone(&self.evaluator);
        let sink = Arc::clone(&self.sink);
        let clock = Arc::clone(&self.clock);

        tokio::spawn(async move {
            Self::process(evaluator, sink, clock, event).await;
        })
    }

    async fn process(
        evaluator: Arc<Evaluator>,
        sink: Arc<dyn VerdictSink>,
        clock: Arc<dyn Clock>,
        event: AlertEvent,
    ) {
        let triggered_at = event.event_time(clock.now());

        match evaluator.evaluate(&event.symbol).await {
            Ok(Evaluation::Classified {
                spot,
                bundle,
                verdict,
            }) => {
                let record = AlertRecord::new(
                    event.symbol.clone(),
                    triggered_at,
                    event.trigger.clone(),
                    spot,
                    bundle,
                    verdict,
                );
                if let Err(e) = sink.deliver(&record).await {
                    error!("[AlertService] {}: verdict delivery failed: {e}", event.symbol);
                }
            }
            Ok(Evaluation::NoOptionChain) => {
                // Informational only, nothing to alert on
                info!("[AlertService] {}: no option chain, skipping", event.symbol);
            }
            Err(e) => {
                error!("[AlertService] {}: evaluation failed: {e}", event.symbol);
            }
        }
    }
}
