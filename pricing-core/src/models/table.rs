//! Output types produced by the pricing engine.
//!
//! A [`PricingTable`] is rebuilt wholesale on every computation: one row per
//! student count (ascending), one cell per classes-per-week value (input
//! order). Cells carry exact, unrounded figures; rounding to display or
//! export precision is the consumer's job.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which algorithm produced a table: solve for price (target) or solve for
/// net income (lesson).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingModeKind {
    Target,
    Lesson,
}

impl fmt::Display for PricingModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingModeKind::Target => f.write_str("target"),
            PricingModeKind::Lesson => f.write_str("lesson"),
        }
    }
}

/// One revenue decomposition: VAT remitted, variable costs, fixed-cost
/// allocation, income tax, and what is left as net income.
///
/// `net_income` may be negative (a loss); no component is ever clamped after
/// the fact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoneySplit {
    pub vat: f64,
    pub variable_costs: f64,
    pub fixed_cost_allocation: f64,
    pub income_tax: f64,
    pub net_income: f64,
}

/// Price totals attached to a breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakdownTotals {
    pub price_incl_vat_per_student: f64,
    pub price_ex_vat_per_student: f64,
    pub price_incl_vat_per_lesson: f64,
    pub price_ex_vat_per_lesson: f64,
    pub students: f64,
    pub classes_per_year: f64,
}

/// Full per-lesson and per-student decomposition of one price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub per_lesson: MoneySplit,
    pub per_student: MoneySplit,
    pub totals: BreakdownTotals,
}

/// A concrete price together with its breakdown and the annual/monthly net
/// income it implies. `monthly_net` is `None` when there are no active
/// months to divide by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price_ex_vat: f64,
    pub price_incl_vat: f64,
    pub breakdown: CostBreakdown,
    pub annual_net: Option<f64>,
    pub monthly_net: Option<f64>,
}

/// Lesson-mode net income figures for one combination, at full attendance
/// and under the configured attendance shortfall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualNet {
    pub annual: Option<f64>,
    pub monthly: Option<f64>,
    pub buffered_annual: Option<f64>,
    pub buffered_monthly: Option<f64>,
}

/// One (students × classes-per-week) combination.
///
/// In target mode `base` is the unbuffered price and `buffered` the price
/// inflated by the safety margin. In lesson mode both quotes carry the fixed
/// manual price and `manual_net` holds the resulting income figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingCell {
    pub classes_per_week: u32,
    /// Kept unrounded; `classes_per_week × working_weeks` is rarely integral.
    pub classes_per_year: f64,
    pub base: PriceQuote,
    pub buffered: PriceQuote,
    pub manual_net: Option<ManualNet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRow {
    pub students: u32,
    pub cells: Vec<PricingCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingTable {
    pub rows: Vec<PricingRow>,
}

impl PricingTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates cells in row-then-column order, the canonical iteration
    /// order for summaries and best-match scans.
    pub fn iter_cells(&self) -> impl Iterator<Item = (&PricingRow, &PricingCell)> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter().map(move |cell| (row, cell)))
    }
}

/// Net income summary backfilled from the first combination that produced a
/// finite annual figure in lesson mode. First hit in iteration order, not a
/// best fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualNetSummary {
    pub annual: f64,
    pub monthly: Option<f64>,
    pub weekly: Option<f64>,
    pub average_weekly: f64,
    pub average_monthly: f64,
}

/// Result of a best-match lookup against a pricing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestMatch {
    pub row: usize,
    pub cell: usize,
    pub students: u32,
    pub classes_per_week: u32,
    /// Whether the requested value matched this axis within tolerance.
    pub exact_students: bool,
    pub exact_classes: bool,
}
