//! Numeric helpers shared across the converter and the engine.

pub const WEEKS_PER_YEAR: f64 = 52.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Floor applied to `1 − rate` style denominators. Keeps quotients very
/// large but finite as a rate approaches 1.
pub const MIN_DENOMINATOR: f64 = 0.0001;

/// Upper bound on tax rates accepted by the gross/net converter.
pub const MAX_CONVERTIBLE_TAX_RATE: f64 = 0.9999;

/// Upper bound on the effective income tax rate inside the engine.
pub const MAX_EFFECTIVE_TAX_RATE: f64 = 0.999;

/// `Some(value)` when finite, `None` otherwise.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// The value when finite, the fallback otherwise.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Clamps to `[0, max]`, treating non-finite input as 0.
pub fn clamp_rate(value: f64, max: f64) -> f64 {
    finite_or(value, 0.0).clamp(0.0, max)
}

/// Non-negative, finite version of a cost or amount field.
pub fn non_negative(value: f64) -> f64 {
    finite_or(value, 0.0).max(0.0)
}
