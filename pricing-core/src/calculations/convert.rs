//! Unit conversions between gross/net amounts and income time bases.
//!
//! All conversions are stateless pure functions. The only cross-call memory
//! the design allows — the gross figure a user locked in while toggling
//! between gross and net display — lives in an explicit [`LockedGrossCache`]
//! the caller owns and passes around.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::common::{
    MAX_CONVERTIBLE_TAX_RATE, MIN_DENOMINATOR, MONTHS_PER_YEAR, WEEKS_PER_YEAR,
};

/// Converts a gross amount to net under a flat tax rate.
///
/// Returns `None` for non-finite amounts. The rate is clamped to
/// `[0, 0.9999]`.
///
/// ```
/// use pricing_core::calculations::convert::gross_to_net;
///
/// assert_eq!(gross_to_net(100.0, 0.40), Some(60.0));
/// assert_eq!(gross_to_net(f64::NAN, 0.40), None);
/// ```
pub fn gross_to_net(amount: f64, tax_rate: f64) -> Option<f64> {
    if !amount.is_finite() {
        return None;
    }
    let rate = tax_rate.clamp(0.0, MAX_CONVERTIBLE_TAX_RATE);
    Some(amount * (1.0 - rate))
}

/// Converts a net amount back to gross under a flat tax rate.
///
/// The `1 − rate` denominator is floored at `0.0001`, so the result is very
/// large but finite as the rate approaches 1; callers must tolerate that
/// rather than receive an infinity.
pub fn net_to_gross(amount: f64, tax_rate: f64) -> Option<f64> {
    if !amount.is_finite() {
        return None;
    }
    let rate = tax_rate.clamp(0.0, MAX_CONVERTIBLE_TAX_RATE);
    let denominator = (1.0 - rate).max(MIN_DENOMINATOR);
    Some(amount / denominator)
}

/// The time unit a net-income figure is expressed in.
///
/// `Week`/`Month` divide by *working* weeks and *active* months (planned
/// time off excluded); `AvgWeek`/`AvgMonth` divide by the calendar 52 and 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncomeBasis {
    Year,
    Week,
    Month,
    AvgWeek,
    AvgMonth,
}

impl IncomeBasis {
    pub const ALL: [IncomeBasis; 5] = [
        IncomeBasis::Year,
        IncomeBasis::Week,
        IncomeBasis::Month,
        IncomeBasis::AvgWeek,
        IncomeBasis::AvgMonth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IncomeBasis::Year => "year",
            IncomeBasis::Week => "week",
            IncomeBasis::Month => "month",
            IncomeBasis::AvgWeek => "avg-week",
            IncomeBasis::AvgMonth => "avg-month",
        }
    }
}

impl fmt::Display for IncomeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annual net figure spread across all five bases.
///
/// `week` and `month` are `None` when the corresponding denominator is zero
/// (an instructor with no working weeks has no meaningful weekly figure).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetBasisAmounts {
    pub year: f64,
    pub week: Option<f64>,
    pub month: Option<f64>,
    pub avg_week: f64,
    pub avg_month: f64,
}

impl NetBasisAmounts {
    pub fn get(&self, basis: IncomeBasis) -> Option<f64> {
        match basis {
            IncomeBasis::Year => Some(self.year),
            IncomeBasis::Week => self.week,
            IncomeBasis::Month => self.month,
            IncomeBasis::AvgWeek => Some(self.avg_week),
            IncomeBasis::AvgMonth => Some(self.avg_month),
        }
    }
}

/// Spreads an annual net figure across all bases.
pub fn spread_annual_net(
    annual_net: f64,
    working_weeks: f64,
    active_months: f64,
) -> NetBasisAmounts {
    let has_weeks = working_weeks.is_finite() && working_weeks > 0.0;
    let has_months = active_months.is_finite() && active_months > 0.0;
    NetBasisAmounts {
        year: annual_net,
        week: has_weeks.then(|| annual_net / working_weeks),
        month: has_months.then(|| annual_net / active_months),
        avg_week: annual_net / WEEKS_PER_YEAR,
        avg_month: annual_net / MONTHS_PER_YEAR,
    }
}

/// Rebuilds the annual figure from a value expressed in `basis`.
///
/// Returns `None` when the basis has no denominator (zero working weeks or
/// active months); the caller falls back to whatever annual figure it
/// already holds. Together with [`spread_annual_net`] this round-trips
/// within floating-point tolerance.
pub fn annual_from_basis(
    basis: IncomeBasis,
    value: f64,
    working_weeks: f64,
    active_months: f64,
) -> Option<f64> {
    match basis {
        IncomeBasis::Year => Some(value),
        IncomeBasis::Week => {
            (working_weeks.is_finite() && working_weeks > 0.0).then(|| value * working_weeks)
        }
        IncomeBasis::Month => {
            (active_months.is_finite() && active_months > 0.0).then(|| value * active_months)
        }
        IncomeBasis::AvgWeek => Some(value * WEEKS_PER_YEAR),
        IncomeBasis::AvgMonth => Some(value * MONTHS_PER_YEAR),
    }
}

/// Per-basis store of the gross figure the user actually entered.
///
/// Net values are re-derived from the stored gross on every read, never
/// chained net→gross→net, so repeated gross/net toggling cannot compound
/// rounding error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LockedGrossCache {
    values: HashMap<IncomeBasis, f64>,
}

impl LockedGrossCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks a gross figure for a basis. Non-finite values clear the slot;
    /// negative values are floored at zero.
    pub fn lock_gross(&mut self, basis: IncomeBasis, gross: f64) {
        if gross.is_finite() {
            self.values.insert(basis, gross.max(0.0));
        } else {
            self.values.remove(&basis);
        }
    }

    /// Locks a basis from a net figure typed by the user, storing the
    /// equivalent gross.
    pub fn lock_net(&mut self, basis: IncomeBasis, net: f64, tax_rate: f64) {
        match net_to_gross(net, tax_rate) {
            Some(gross) => self.lock_gross(basis, gross),
            None => {
                self.values.remove(&basis);
            }
        }
    }

    pub fn gross(&self, basis: IncomeBasis) -> Option<f64> {
        self.values.get(&basis).copied()
    }

    /// The net value for a basis under the given tax rate, derived fresh
    /// from the stored gross.
    pub fn net(&self, basis: IncomeBasis, tax_rate: f64) -> Option<f64> {
        self.gross(basis).and_then(|gross| gross_to_net(gross, tax_rate))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
