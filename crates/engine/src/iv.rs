//! Black-Scholes pricing and implied-volatility recovery.

use statrs::function::erf::erf;
use vega_core::OptionKind;

/// Lower bisection bracket for volatility
const SIGMA_LO: f64 = 1e-6;
/// Upper bisection bracket for volatility
const SIGMA_HI: f64 = 5.0;
/// Fixed iteration cap
const MAX_ITERATIONS: usize = 100;
/// Absolute price tolerance for early convergence
const PRICE_TOLERANCE: f64 = 1e-4;

/// Standard normal CDF
fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Black-Scholes price of a European option.
///
/// Degenerate inputs (`sigma <= 0` or `t <= 0`) price at 0.
pub fn bs_price(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64, kind: OptionKind) -> f64 {
    if sigma <= 0.0 || t <= 0.0 {
        return 0.0;
    }

    let sqrt_t = t.sqrt();
    let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / (sigma * sqrt_t);
    let d2 = d1 - sigma * sqrt_t;

    let sign = kind.sign();
    sign * (s * (-q * t).exp() * norm_cdf(sign * d1) - k * (-r * t).exp() * norm_cdf(sign * d2))
}

/// Recover implied volatility from an observed option price by bisection.
///
/// Brackets sigma in [1e-6, 5.0] and runs a fixed 100 iterations, returning
/// early once the midpoint prices within 1e-4 of the observed price. If the
/// loop exhausts its iterations the final midpoint is returned as-is;
/// non-convergence is silent and the caller tolerates an approximate
/// result.
///
/// Assumes the price is monotonically increasing in sigma over the
/// bracket. For extreme low time-to-expiry or deep in/out-of-the-money
/// inputs that assumption is a known approximation boundary.
pub fn implied_vol(observed: f64, s: f64, k: f64, t: f64, r: f64, q: f64, kind: OptionKind) -> f64 {
    let mut lo = SIGMA_LO;
    let mut hi = SIGMA_HI;
    let mut mid = 0.5 * (lo + hi);

    for _ in 0..MAX_ITERATIONS {
        mid = 0.5 * (lo + hi);
        let price = bs_price(s, k, t, r, q, mid, kind);

        if (price - observed).abs() < PRICE_TOLERANCE {
            return mid;
        }

        if price < observed {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    mid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_inputs_price_at_zero() {
        assert_eq!(bs_price(100.0, 100.0, 0.1, 0.07, 0.0, 0.0, OptionKind::Call), 0.0);
        assert_eq!(bs_price(100.0, 100.0, 0.1, 0.07, 0.0, -0.2, OptionKind::Put), 0.0);
        assert_eq!(bs_price(100.0, 100.0, 0.0, 0.07, 0.0, 0.2, OptionKind::Call), 0.0);
        assert_eq!(bs_price(100.0, 100.0, -1.0, 0.07, 0.0, 0.2, OptionKind::Put), 0.0);
    }

    #[test]
    fn test_call_price_above_discounted_intrinsic() {
        // Deep ITM call is worth at least forward intrinsic value
        let price = bs_price(120.0, 100.0, 0.1, 0.07, 0.0, 0.2, OptionKind::Call);
        let intrinsic = 120.0 - 100.0 * (-0.07f64 * 0.1).exp();
        assert!(price > intrinsic);
        assert!(price < 120.0);
    }

    #[test]
    fn test_put_call_parity() {
        let (s, k, t, r, q, sigma) = (100.0, 105.0, 0.25, 0.07, 0.0, 0.3);
        let call = bs_price(s, k, t, r, q, sigma, OptionKind::Call);
        let put = bs_price(s, k, t, r, q, sigma, OptionKind::Put);
        let parity = s * (-q * t).exp() - k * (-r * t).exp();
        assert!((call - put - parity).abs() < 1e-10);
    }

    #[test]
    fn test_implied_vol_round_trip() {
        let (s, k, t, r, q) = (100.0, 100.0, 0.1, 0.07, 0.0);
        for kind in [OptionKind::Call, OptionKind::Put] {
            for sigma in [0.1, 0.2, 0.5] {
                let price = bs_price(s, k, t, r, q, sigma, kind);
                let recovered = implied_vol(price, s, k, t, r, q, kind);
                assert!(
                    (recovered - sigma).abs() < 1e-3,
                    "{kind} sigma={sigma}: recovered {recovered}"
                );
            }
        }
    }

    #[test]
    fn test_non_convergence_is_silent() {
        // Price far above anything the bracket can produce: the solver
        // must still return the final midpoint, not error
        let iv = implied_vol(1_000.0, 100.0, 100.0, 0.1, 0.07, 0.0, OptionKind::Call);
        assert!(iv > 4.9 && iv <= 5.0);
    }
}
