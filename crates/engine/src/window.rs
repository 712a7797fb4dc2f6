//! At-the-money strike selection and the derived strike windows.

use vega_core::Price;

/// Default display-window radius in strikes either side of ATM
pub const DEFAULT_RADIUS: usize = 2;

/// The strike windows one evaluation operates over. Recomputed for every
/// alert; never cached across symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct StrikeWindow {
    /// Strike nearest to spot (exact tie resolves to the smaller strike)
    pub atm: Price,
    /// ATM +/- radius, for per-strike confirmation tags
    pub display: Vec<Price>,
    /// ATM +/- 1, for premium-move aggregation
    pub delta: Vec<Price>,
    /// The two strikes strictly below ATM, for put open-interest
    /// comparison (fewer near the bottom of the chain)
    pub baseline: Vec<Price>,
}

impl StrikeWindow {
    /// Select the windows for a spot price out of the available strikes.
    ///
    /// Returns `None` when no strikes exist for the resolved expiry - the
    /// caller must treat this as "no option chain" and short-circuit to a
    /// degenerate signal bundle.
    pub fn select(spot: Price, strikes: &[Price], radius: usize) -> Option<Self> {
        let mut sorted = strikes.to_vec();
        sorted.sort();
        sorted.dedup();

        if sorted.is_empty() {
            return None;
        }

        // Nearest strike; ascending scan with strict less-than keeps the
        // smaller strike on an exact tie
        let mut atm_idx = 0;
        let mut best = (sorted[0] - spot).abs();
        for (i, strike) in sorted.iter().enumerate().skip(1) {
            let distance = (*strike - spot).abs();
            if distance < best {
                best = distance;
                atm_idx = i;
            }
        }

        let lo = atm_idx.saturating_sub(radius);
        let hi = (atm_idx + radius).min(sorted.len() - 1);
        let display = sorted[lo..=hi].to_vec();

        let delta_lo = atm_idx.saturating_sub(1);
        let delta_hi = (atm_idx + 1).min(sorted.len() - 1);
        let delta = sorted[delta_lo..=delta_hi].to_vec();

        let baseline = sorted[atm_idx.saturating_sub(2)..atm_idx].to_vec();

        Some(Self {
            atm: sorted[atm_idx],
            display,
            delta,
            baseline,
        })
    }
}
