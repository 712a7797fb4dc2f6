//! End-to-end alert flow: webhook event in, alert record out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vega_clock::FixedClock;
use vega_core::{
    AlertRecord, Candle, InstrumentId, OptionKind, Price, Quote, Symbol, Timestamp, Trend,
};
use vega_ports::{
    BaselineSnapshot, BaselineStore, DataResult, InstrumentResolver, MarketData, MarketDataError,
    VerdictSink,
};
use vega_runner::{AlertEvent, RunnerConfig, ServiceBootstrap};

fn leg_id(symbol: &str, strike: Decimal, kind: OptionKind) -> String {
    format!("{symbol}{strike}{kind}")
}

#[derive(Default)]
struct MockMarket {
    spots: HashMap<String, Price>,
    quotes: HashMap<String, Quote>,
    bars: HashMap<String, Vec<Candle>>,
}

#[async_trait]
impl MarketData for MockMarket {
    async fn spot(&self, symbol: &Symbol) -> DataResult<Price> {
        self.spots
            .get(symbol)
            .copied()
            .ok_or_else(|| MarketDataError::Unavailable(symbol.clone()))
    }

    async fn quote(&self, instrument: &InstrumentId) -> DataResult<Quote> {
        self.quotes
            .get(instrument.as_str())
            .cloned()
            .ok_or_else(|| MarketDataError::Unavailable(instrument.to_string()))
    }

    async fn bars(&self, instrument: &InstrumentId, _since: Timestamp) -> DataResult<Vec<Candle>> {
        self.bars
            .get(instrument.as_str())
            .cloned()
            .ok_or_else(|| MarketDataError::Unavailable(instrument.to_string()))
    }
}

struct MockResolver {
    expiry: NaiveDate,
    chains: HashMap<String, Vec<Price>>,
}

#[async_trait]
impl InstrumentResolver for MockResolver {
    async fn resolve_expiry(&self, _symbol: &Symbol) -> DataResult<NaiveDate> {
        Ok(self.expiry)
    }

    async fn strikes(&self, symbol: &Symbol, _expiry: NaiveDate) -> DataResult<Vec<Price>> {
        Ok(self.chains.get(symbol).cloned().unwrap_or_default())
    }

    async fn option_instrument(
        &self,
        symbol: &Symbol,
        _expiry: NaiveDate,
        strike: Price,
        kind: OptionKind,
    ) -> DataResult<Option<InstrumentId>> {
        Ok(Some(InstrumentId::new(leg_id(symbol, strike, kind))))
    }
}

#[derive(Default)]
struct NullStore;

#[async_trait]
impl BaselineStore for NullStore {
    async fn load(&self, _day: NaiveDate) -> DataResult<BaselineSnapshot> {
        Ok(BaselineSnapshot::new())
    }

    async fn save(&self, _day: NaiveDate, _snapshot: &BaselineSnapshot) -> DataResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct MockSink {
    records: Mutex<Vec<AlertRecord>>,
}

#[async_trait]
impl VerdictSink for MockSink {
    async fn deliver(&self, record: &AlertRecord) -> DataResult<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Populate one symbol with a clean confirmed-up market around spot 104:
/// calls up 6.00, puts down 14.00, flat put OI, strong call volume.
fn populate_symbol(market: &mut MockMarket, symbol: &str) {
    market.spots.insert(symbol.to_string(), dec!(104));

    let quotes = [
        (dec!(100), OptionKind::Call, dec!(10), dec!(12), 0),
        (dec!(105), OptionKind::Call, dec!(7), dec!(9), 0),
        (dec!(110), OptionKind::Call, dec!(5), dec!(7), 0),
        (dec!(100), OptionKind::Put, dec!(6), dec!(1), 0),
        (dec!(105), OptionKind::Put, dec!(9), dec!(4), 0),
        (dec!(110), OptionKind::Put, dec!(12), dec!(8), 0),
    ];
    for (strike, kind, open, last, oi) in quotes {
        market.quotes.insert(
            leg_id(symbol, strike, kind),
            Quote {
                last_price: last,
                open_price: open,
                open_interest: oi,
            },
        );
    }

    market.bars.insert(
        leg_id(symbol, dec!(105), OptionKind::Call),
        vec![
            Candle {
                open: dec!(7),
                high: dec!(8),
                low: dec!(7),
                close: dec!(8),
                volume: 100,
            },
            Candle {
                open: dec!(8),
                high: dec!(9),
                low: dec!(8),
                close: dec!(9),
                volume: 100,
            },
            Candle {
                open: dec!(9),
                high: dec!(9),
                low: dec!(8),
                close: dec!(9),
                volume: 100,
            },
            Candle {
                open: dec!(9),
                high: dec!(9),
                low: dec!(8),
                close: dec!(9),
                volume: 200,
            },
        ],
    );
}

fn chain() -> Vec<Price> {
    vec![dec!(100), dec!(105), dec!(110)]
}

fn bootstrap(market: MockMarket, chains: HashMap<String, Vec<Price>>) -> (ServiceBootstrap, Arc<MockSink>) {
    let resolver = MockResolver {
        expiry: NaiveDate::from_ymd_opt(2024, 8, 29).unwrap(),
        chains,
    };
    let sink = Arc::new(MockSink::default());
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 8, 5, 6, 0, 0).unwrap());

    let boot = ServiceBootstrap::new(
        Arc::new(market),
        Arc::new(resolver),
        Arc::new(NullStore),
        Arc::clone(&sink) as Arc<dyn VerdictSink>,
        Arc::new(clock),
        RunnerConfig::default(),
    );
    (boot, sink)
}

#[tokio::test]
async fn test_alert_is_evaluated_and_delivered() {
    let _ = env_logger::try_init();
    let mut market = MockMarket::default();
    populate_symbol(&mut market, "NIFTY");

    let (boot, sink) = bootstrap(market, HashMap::from([("NIFTY".to_string(), chain())]));

    let event: AlertEvent = serde_json::from_str(
        r#"{"symbol": "NIFTY", "triggered_at": 1722835800, "trigger": "5m breakout"}"#,
    )
    .unwrap();
    boot.service.handle(event).await.unwrap();

    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.symbol, "NIFTY");
    assert_eq!(record.trigger.as_deref(), Some("5m breakout"));
    assert_eq!(record.spot, dec!(104));
    assert_eq!(
        record.triggered_at,
        Utc.with_ymd_and_hms(2024, 8, 5, 5, 30, 0).unwrap()
    );
    assert_eq!(record.bundle.dce, dec!(6.00));
    assert_eq!(record.bundle.dpe, dec!(-14.00));
    assert_eq!(record.bundle.doi_put, 0);
    assert_eq!(record.bundle.call_vol_ratio, 2.0);
    assert!(record.verdict.flags.is_empty());
    assert_eq!(record.verdict.trend, Trend::ConfirmedUp);
    assert_eq!(record.verdict.flags_label(), "OK");
}

#[tokio::test]
async fn test_no_chain_alert_is_not_delivered() {
    let mut market = MockMarket::default();
    populate_symbol(&mut market, "NIFTY");

    // Chain resolves empty for this symbol
    let (boot, sink) = bootstrap(market, HashMap::from([("NIFTY".to_string(), Vec::new())]));

    boot.service.handle(AlertEvent::new("NIFTY")).await.unwrap();

    assert!(sink.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_spot_is_not_delivered() {
    // No spot configured at all
    let (boot, sink) = bootstrap(
        MockMarket::default(),
        HashMap::from([("NIFTY".to_string(), chain())]),
    );

    boot.service.handle(AlertEvent::new("NIFTY")).await.unwrap();

    assert!(sink.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_alerts_for_different_symbols() {
    let mut market = MockMarket::default();
    populate_symbol(&mut market, "NIFTY");
    populate_symbol(&mut market, "BANKNIFTY");

    let (boot, sink) = bootstrap(
        market,
        HashMap::from([
            ("NIFTY".to_string(), chain()),
            ("BANKNIFTY".to_string(), chain()),
        ]),
    );

    let first = boot.service.handle(AlertEvent::new("NIFTY"));
    let second = boot.service.handle(AlertEvent::new("BANKNIFTY"));
    first.await.unwrap();
    second.await.unwrap();

    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 2);

    let mut symbols: Vec<_> = records.iter().map(|r| r.symbol.clone()).collect();
    symbols.sort();
    assert_eq!(symbols, vec!["BANKNIFTY", "NIFTY"]);
    for record in records.iter() {
        assert_eq!(record.verdict.trend, Trend::ConfirmedUp);
    }
}
