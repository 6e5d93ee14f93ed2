//! The normalized input record consumed by the pricing engine.

use serde::{Deserialize, Serialize};

use crate::models::table::PricingModeKind;

/// Selects the pricing algorithm and carries its mode-specific figure.
///
/// The two modes are structurally distinct so a computation can never fall
/// through to the wrong branch: either we solve for a price that meets a
/// desired annual net income, or we take a fixed per-student lesson price
/// (VAT included) and solve for the income it yields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PricingMode {
    Target { target_net_annual: f64 },
    Lesson { price_incl_vat: f64 },
}

impl PricingMode {
    pub fn kind(&self) -> PricingModeKind {
        match self {
            PricingMode::Target { .. } => PricingModeKind::Target,
            PricingMode::Lesson { .. } => PricingModeKind::Lesson,
        }
    }
}

/// One immutable set of pricing inputs, produced fresh per computation by
/// the calling layer (which owns parsing, clamping, and defaulting of raw
/// field values).
///
/// Rates are fractions, not percentages: a 21% VAT arrives as `0.21`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    pub mode: PricingMode,
    /// Flat effective income tax rate, expected in `[0, 0.999]`.
    pub tax_rate: f64,
    pub vat_rate: f64,
    pub fixed_costs_annual: f64,
    pub variable_cost_per_class: f64,
    pub variable_cost_per_student_per_class: f64,
    pub variable_cost_per_student_per_month: f64,
    /// Ascending, deduplicated. Empty list ⇒ empty pricing table.
    pub classes_per_week: Vec<u32>,
    /// Ascending, deduplicated. Empty list ⇒ empty pricing table.
    pub students_per_class: Vec<u32>,
    pub hours_per_lesson: f64,
    /// Safety margin fraction. Target mode inflates the price by it; lesson
    /// mode deflates revenue by it (attendance shortfall).
    pub buffer_rate: f64,
    pub working_weeks_per_year: f64,
    pub active_months_per_year: f64,
    pub currency_symbol: String,
}

impl PricingInputs {
    /// Buffer expressed as a percentage, as shown to users and in exports.
    pub fn buffer_percent(&self) -> f64 {
        self.buffer_rate * 100.0
    }

    /// True when both schedule axes are populated.
    pub fn has_schedule(&self) -> bool {
        !self.classes_per_week.is_empty() && !self.students_per_class.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mode_kind_distinguishes_variants() {
        let target = PricingMode::Target { target_net_annual: 50000.0 };
        let lesson = PricingMode::Lesson { price_incl_vat: 25.0 };

        assert_eq!(target.kind(), PricingModeKind::Target);
        assert_eq!(lesson.kind(), PricingModeKind::Lesson);
    }

    #[test]
    fn buffer_percent_scales_rate() {
        let inputs = PricingInputs {
            mode: PricingMode::Target { target_net_annual: 50000.0 },
            tax_rate: 0.4,
            vat_rate: 0.21,
            fixed_costs_annual: 0.0,
            variable_cost_per_class: 0.0,
            variable_cost_per_student_per_class: 0.0,
            variable_cost_per_student_per_month: 0.0,
            classes_per_week: vec![2],
            students_per_class: vec![4],
            hours_per_lesson: 1.0,
            buffer_rate: 0.15,
            working_weeks_per_year: 48.0,
            active_months_per_year: 10.0,
            currency_symbol: "€".to_string(),
        };

        assert_eq!(inputs.buffer_percent(), 15.0);
        assert!(inputs.has_schedule());
    }
}
