//! Aggregated signals, classification thresholds and the final verdict.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market::OptionKind;
use crate::values::Price;

/// Classification thresholds, immutable after process start.
///
/// Shared read-only by all evaluations; every comparison the classifier
/// makes is against one of these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// ΔCE above which a call-premium move counts as "big"
    pub ce_big: Decimal,
    /// |ΔPE| below which the put side counts as flat
    pub pe_flat: Decimal,
    /// Required put-to-call premium response multiple for a confirmed move
    pub pe_mult: Decimal,
    /// ΔOI_put above which put open interest counts as rising
    pub oi_rise: i64,
    /// Skew z-score above which the skew move counts as a jump
    pub skew_sigma: f64,
    /// Minimum call-volume ratio for real participation
    pub call_vol_req: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ce_big: Decimal::new(3, 0),
            pe_flat: Decimal::ONE,
            pe_mult: Decimal::TWO,
            oi_rise: 1_000,
            skew_sigma: 2.0,
            call_vol_req: 1.5,
        }
    }
}

/// Per-strike volume confirmation for one option leg, computed over the
/// full display window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegConfirmation {
    pub strike: Price,
    pub kind: OptionKind,
    pub confirmed: bool,
}

/// The aggregated scalars for one evaluation.
///
/// Created fresh per alert and discarded after producing the verdict.
/// Every field carries an explicit zero/neutral default so the classifier
/// never operates on undefined input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    /// Sum of call-premium moves across the delta window, 2 dp
    pub dce: Decimal,
    /// Sum of put-premium moves across the delta window, 2 dp
    pub dpe: Decimal,
    /// Put open-interest change vs the session-open baseline
    pub doi_put: i64,
    /// Max latest-bar-to-trailing-mean volume ratio across call legs
    pub call_vol_ratio: f64,
    /// 100 x (ATM call IV - ATM put IV), 2 dp
    pub skew: f64,
    /// z-score of the current skew against the rolling window
    pub skew_jump: f64,
    /// Per-strike confirmation tags over the display window
    pub confirmations: Vec<LegConfirmation>,
}

impl Default for SignalBundle {
    fn default() -> Self {
        Self {
            dce: Decimal::ZERO,
            dpe: Decimal::ZERO,
            doi_put: 0,
            call_vol_ratio: 0.0,
            skew: 0.0,
            skew_jump: 0.0,
            confirmations: Vec::new(),
        }
    }
}

/// Named trigger raised by the classifier. Independent; any subset may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    /// Skew jumped while calls ran up against a flat put side
    IvPump,
    /// Call premium ran up without volume participation
    LowVol,
    /// Put open interest rose against the session-open baseline
    PutOiRise,
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flag::IvPump => write!(f, "IV Pump"),
            Flag::LowVol => write!(f, "Low Vol"),
            Flag::PutOiRise => write!(f, "Put OI Rise"),
        }
    }
}

/// Trend label, mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Sideways,
    ConfirmedUp,
    FakeUp,
    ConfirmedDown,
    FakeDown,
    Unconfirmed,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Sideways => write!(f, "Sideways"),
            Trend::ConfirmedUp => write!(f, "Confirmed Up"),
            Trend::FakeUp => write!(f, "Fake Up"),
            Trend::ConfirmedDown => write!(f, "Confirmed Down"),
            Trend::FakeDown => write!(f, "Fake Down"),
            Trend::Unconfirmed => write!(f, "Unconfirmed"),
        }
    }
}

/// Output of the classifier. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub flags: Vec<Flag>,
    pub trend: Trend,
}

impl Verdict {
    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Human-readable flag list; the empty set renders as "OK"
    pub fn flags_label(&self) -> String {
        if self.flags.is_empty() {
            "OK".to_string()
        } else {
            self.flags
                .iter()
                .map(Flag::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}
