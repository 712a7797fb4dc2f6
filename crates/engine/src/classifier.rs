//! The flag and trend classifier.
//!
//! A pure function of the aggregated signals and the configured
//! thresholds; no side effects beyond its return value, and it cannot
//! fail given a well-formed bundle.

use rust_decimal::Decimal;
use vega_core::{Flag, SignalBundle, Thresholds, Trend, Verdict};

/// ΔCE magnitude below which the move is sideways noise
fn sideways_band() -> Decimal {
    Decimal::new(5, 1) // 0.5
}

/// Classify one evaluation's signal bundle into flags and a trend label.
///
/// Flags are independent; any subset may fire. The trend is evaluated in
/// fixed order: the sideways band wins outright, then the directional
/// branches check the confirming conditions, with any raised flag
/// overriding an otherwise-good move.
pub fn classify(bundle: &SignalBundle, thresholds: &Thresholds) -> Verdict {
    let mut flags = Vec::new();

    if bundle.skew_jump > thresholds.skew_sigma
        && bundle.dce > thresholds.ce_big
        && bundle.dpe.abs() < thresholds.pe_flat
    {
        flags.push(Flag::IvPump);
    }

    if bundle.call_vol_ratio < thresholds.call_vol_req && bundle.dce > thresholds.ce_big {
        flags.push(Flag::LowVol);
    }

    if bundle.doi_put > thresholds.oi_rise {
        flags.push(Flag::PutOiRise);
    }

    let trend = if bundle.dce.abs() < sideways_band() {
        Trend::Sideways
    } else if bundle.dce > Decimal::ZERO {
        let good = bundle.dpe <= -(thresholds.pe_mult * bundle.dce.abs())
            && bundle.doi_put <= 0
            && bundle.call_vol_ratio >= thresholds.call_vol_req;
        if good && flags.is_empty() {
            Trend::ConfirmedUp
        } else if !flags.is_empty() {
            Trend::FakeUp
        } else {
            Trend::Unconfirmed
        }
    } else {
        let good = bundle.dpe >= thresholds.pe_mult * bundle.dce.abs()
            && bundle.doi_put >= 0
            && bundle.call_vol_ratio >= thresholds.call_vol_req;
        if good && flags.is_empty() {
            Trend::ConfirmedDown
        } else if !flags.is_empty() {
            Trend::FakeDown
        } else {
            Trend::Unconfirmed
        }
    };

    Verdict { flags, trend }
}
