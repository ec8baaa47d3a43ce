//! Fixed-point percentage arithmetic.
//!
//! All allocation fractions in this crate are expressed against a single
//! implicit scalar `S = 10^18`: a fraction of `0.25` is stored as the raw
//! integer `0.25 * S`. Token balances and amounts are plain signed
//! integers in each token's native decimals — they are never themselves
//! scaled by `S`.
//!
//! `i128` backs both. None of the repos this crate was modeled on pull in
//! a signed big-integer type (`ethereum-types::U256`, used for on-chain
//! amounts elsewhere in this codebase's ancestry, is unsigned and cannot
//! hold the legitimately-negative intermediates this crate's math
//! produces), and `i128` comfortably covers realistic 18-decimal token
//! balances multiplied through the `1e18` scalar.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// `10^18`, the implicit fixed-point scalar for all percentages.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

/// A percentage/fraction scaled by [`SCALE`]. Can be negative — a chain
/// that has drawn down past its shortfall produces a negative allocation,
/// and that must be preserved rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Pct(pub i128);

impl Pct {
    pub const ZERO: Pct = Pct(0);

    pub fn from_raw(raw: i128) -> Self {
        Pct(raw)
    }

    /// Build a `Pct` from a human fraction, e.g. `Pct::from_fraction(0.25)` for 25%.
    /// Only used for config/tests — the core itself never produces a `Pct` this way.
    pub fn from_fraction(fraction: f64) -> Self {
        Pct((fraction * SCALE as f64).round() as i128)
    }

    pub fn raw(self) -> i128 {
        self.0
    }

    /// `numerator * SCALE / denominator`, truncating toward zero. Returns
    /// `Pct::ZERO` when `denominator` is zero rather than panicking — per
    /// spec, division-by-zero guards must degrade to "no signal", not a crash.
    pub fn from_ratio(numerator: i128, denominator: i128) -> Self {
        if denominator == 0 {
            return Pct::ZERO;
        }
        Pct(mul_div(numerator, SCALE, denominator).unwrap_or(0))
    }

    /// Applies this percentage to a raw token amount: `self * amount / SCALE`,
    /// multiplying before dividing to retain precision, as the spec requires.
    pub fn apply_to(self, amount: i128) -> i128 {
        mul_div(self.0, amount, SCALE).unwrap_or(0)
    }
}

impl fmt::Display for Pct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}%", (self.0 as f64 / SCALE as f64) * 100.0)
    }
}

impl Add for Pct {
    type Output = Pct;
    fn add(self, rhs: Pct) -> Pct {
        Pct(self.0 + rhs.0)
    }
}

impl Sub for Pct {
    type Output = Pct;
    fn sub(self, rhs: Pct) -> Pct {
        Pct(self.0 - rhs.0)
    }
}

impl Neg for Pct {
    type Output = Pct;
    fn neg(self) -> Pct {
        Pct(-self.0)
    }
}

/// `a * b / denom`, truncating toward zero. `None` on overflow or division
/// by a zero denominator — callers decide how to degrade.
pub fn mul_div(a: i128, b: i128, denom: i128) -> Option<i128> {
    if denom == 0 {
        return None;
    }
    a.checked_mul(b)?.checked_div(denom)
}
