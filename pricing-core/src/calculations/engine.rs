//! The dual-mode pricing engine.
//!
//! Given one [`PricingInputs`] record the engine produces a full
//! [`PricingTable`]: one row per student count, one cell per classes-per-week
//! value, each cell carrying a base and a buffered variant with a complete
//! cost breakdown.
//!
//! # Modes
//!
//! **Target mode** solves for the per-student lesson price that meets a
//! desired annual net income:
//!
//! 1. `profit_before_tax = target_net / max(1 − tax_rate, 0.0001)`
//! 2. `revenue_needed = profit_before_tax + fixed_costs`
//! 3. per combination, variable costs are added and the total is divided by
//!    `max(classes_per_year, 1)` and `max(students, 1)` to get the ex-VAT
//!    price; VAT is applied multiplicatively on top.
//!
//! The buffered variant inflates the ex-VAT price by the buffer rate before
//! VAT — a safety margin against attendance shortfall. Its breakdown is
//! recomputed from the buffered price, not scaled from the base one, because
//! VAT and income tax interact nonlinearly with price.
//!
//! **Lesson mode** takes a fixed per-student price (VAT included) and solves
//! for the net income each combination yields. Here the buffer deflates
//! *revenue* (`× (1 − buffer_rate)`), modelling the same shortfall from the
//! other side. The two buffer directions are deliberately separate code
//! paths; they are different quantities, not one factor with a sign flip.
//!
//! Income tax applies only when profit before tax is positive; losses pass
//! through untaxed and `net_income` may legitimately be negative.
//!
//! The engine is a pure function of its inputs: no I/O, no hidden state, and
//! computing twice from the same record yields identical tables.
//!
//! # Example
//!
//! ```
//! use pricing_core::{PricingEngine, PricingInputs, PricingMode};
//!
//! let inputs = PricingInputs {
//!     mode: PricingMode::Target { target_net_annual: 50000.0 },
//!     tax_rate: 0.40,
//!     vat_rate: 0.21,
//!     fixed_costs_annual: 6000.0,
//!     variable_cost_per_class: 0.0,
//!     variable_cost_per_student_per_class: 0.0,
//!     variable_cost_per_student_per_month: 0.0,
//!     classes_per_week: vec![2],
//!     students_per_class: vec![4],
//!     hours_per_lesson: 1.0,
//!     buffer_rate: 0.15,
//!     working_weeks_per_year: 48.0,
//!     active_months_per_year: 10.0,
//!     currency_symbol: "€".to_string(),
//! };
//!
//! let outcome = PricingEngine::new(inputs).compute();
//! let cell = &outcome.table.rows[0].cells[0];
//!
//! // (50000 / 0.6 + 6000) / 96 classes / 4 students ≈ 232.64 ex VAT
//! assert!((cell.base.price_ex_vat - 232.64).abs() < 0.01);
//! assert!((cell.base.price_incl_vat - 281.49).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{
    MAX_EFFECTIVE_TAX_RATE, MIN_DENOMINATOR, clamp_rate, finite, finite_or, non_negative,
};
use crate::calculations::convert::spread_annual_net;
use crate::models::{
    BestMatch, BreakdownTotals, CostBreakdown, ManualNet, ManualNetSummary, MoneySplit,
    PriceQuote, PricingCell, PricingInputs, PricingMode, PricingModeKind, PricingRow,
    PricingTable,
};

/// Difference below which an axis of a best-match lookup counts as exact.
const EXACT_MATCH_TOLERANCE: f64 = 1e-6;

/// Everything one computation produces besides the table itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOutcome {
    pub mode: PricingModeKind,
    pub table: PricingTable,
    /// Buffer expressed as a percentage, for display and export labels.
    pub buffer_percent: f64,
    /// Target mode: annual ex-VAT revenue required before variable costs.
    /// `None` in lesson mode or when the figure is not finite.
    pub revenue_needed: Option<f64>,
    /// Lesson mode: income figures from the first combination that produced
    /// a finite annual net, in iteration order. A literal first hit, not a
    /// best fit.
    pub manual_net_summary: Option<ManualNetSummary>,
}

/// Pricing computation over one immutable input record.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    inputs: PricingInputs,
}

/// Input fields after defensive sanitizing: rates clamped, costs floored at
/// zero, non-finite values replaced. The engine never fails on malformed
/// numbers; it degrades.
struct Normalized {
    tax_rate: f64,
    vat_rate: f64,
    buffer: f64,
    fixed_costs: f64,
    cost_per_class: f64,
    cost_per_student_per_class: f64,
    cost_per_student_per_month: f64,
    working_weeks: f64,
    active_months: f64,
}

impl PricingEngine {
    pub fn new(inputs: PricingInputs) -> Self {
        Self { inputs }
    }

    pub fn inputs(&self) -> &PricingInputs {
        &self.inputs
    }

    /// Runs the computation for the engine's input record.
    ///
    /// Never fails: an unusable schedule (empty students or classes list,
    /// zero working weeks) or a non-positive revenue requirement yields an
    /// empty table, reported via the outcome rather than an error.
    pub fn compute(&self) -> PricingOutcome {
        let n = self.normalize();
        let mut outcome = PricingOutcome {
            mode: self.inputs.mode.kind(),
            table: PricingTable::default(),
            buffer_percent: n.buffer * 100.0,
            revenue_needed: None,
            manual_net_summary: None,
        };

        if !self.inputs.has_schedule() || n.working_weeks <= 0.0 {
            warn!(
                classes = self.inputs.classes_per_week.len(),
                students = self.inputs.students_per_class.len(),
                working_weeks = n.working_weeks,
                "no valid schedule; returning empty pricing table"
            );
            return outcome;
        }

        let mut students = self.inputs.students_per_class.clone();
        students.sort_unstable();

        // Column order follows the input list; rows ascend by student count.
        let columns: Vec<(u32, f64)> = self
            .inputs
            .classes_per_week
            .iter()
            .map(|&classes| (classes, f64::from(classes) * n.working_weeks))
            .collect();

        match self.inputs.mode {
            PricingMode::Target { target_net_annual } => {
                self.compute_target(&n, target_net_annual, &students, &columns, &mut outcome);
            }
            PricingMode::Lesson { price_incl_vat } => {
                self.compute_lesson(&n, price_incl_vat, &students, &columns, &mut outcome);
            }
        }

        outcome
    }

    fn normalize(&self) -> Normalized {
        let i = &self.inputs;
        Normalized {
            tax_rate: clamp_rate(i.tax_rate, MAX_EFFECTIVE_TAX_RATE),
            vat_rate: non_negative(i.vat_rate),
            buffer: non_negative(i.buffer_rate),
            fixed_costs: non_negative(i.fixed_costs_annual),
            cost_per_class: non_negative(i.variable_cost_per_class),
            cost_per_student_per_class: non_negative(i.variable_cost_per_student_per_class),
            cost_per_student_per_month: non_negative(i.variable_cost_per_student_per_month),
            working_weeks: non_negative(i.working_weeks_per_year),
            active_months: non_negative(i.active_months_per_year),
        }
    }

    fn compute_target(
        &self,
        n: &Normalized,
        target_net_annual: f64,
        students: &[u32],
        columns: &[(u32, f64)],
        outcome: &mut PricingOutcome,
    ) {
        let target_net = non_negative(target_net_annual);
        let net_factor = (1.0 - n.tax_rate).max(MIN_DENOMINATOR);
        let profit_before_tax = target_net / net_factor;
        let revenue_needed = profit_before_tax + n.fixed_costs;
        outcome.revenue_needed = finite(revenue_needed);

        if !revenue_needed.is_finite() || revenue_needed <= 0.0 {
            warn!(revenue_needed, "required revenue not positive; returning empty pricing table");
            return;
        }

        for &student_count in students {
            let students_f = f64::from(student_count);
            let mut row = PricingRow { students: student_count, cells: Vec::with_capacity(columns.len()) };

            for &(classes_per_week, classes_per_year) in columns {
                let annual_variable = self.annual_variable_costs(n, students_f, classes_per_year);
                let revenue_for_combo = revenue_needed + annual_variable;
                let revenue_per_class = revenue_for_combo / classes_per_year.max(1.0);
                let price_ex_vat = revenue_per_class / students_f.max(1.0);
                let buffered_ex_vat = price_ex_vat * (1.0 + n.buffer);
                let price_incl_vat = price_ex_vat * (1.0 + n.vat_rate);
                let buffered_incl_vat = buffered_ex_vat * (1.0 + n.vat_rate);

                row.cells.push(PricingCell {
                    classes_per_week,
                    classes_per_year,
                    base: self.quote(n, price_ex_vat, price_incl_vat, students_f, classes_per_year),
                    buffered: self.quote(
                        n,
                        buffered_ex_vat,
                        buffered_incl_vat,
                        students_f,
                        classes_per_year,
                    ),
                    manual_net: None,
                });
            }

            outcome.table.rows.push(row);
        }
    }

    fn compute_lesson(
        &self,
        n: &Normalized,
        price_incl_vat: f64,
        students: &[u32],
        columns: &[(u32, f64)],
        outcome: &mut PricingOutcome,
    ) {
        let price_incl_vat = non_negative(price_incl_vat);
        let vat_divisor = (1.0 + n.vat_rate).max(MIN_DENOMINATOR);
        let price_ex_vat = price_incl_vat / vat_divisor;
        // Fraction of revenue expected to materialize given the shortfall.
        let attendance = (1.0 - n.buffer).max(0.0);

        for &student_count in students {
            let students_f = f64::from(student_count);
            let mut row = PricingRow { students: student_count, cells: Vec::with_capacity(columns.len()) };

            for &(classes_per_week, classes_per_year) in columns {
                let annual_revenue = price_ex_vat * students_f * classes_per_year;
                let buffered_revenue = annual_revenue * attendance;
                let annual_variable = self.annual_variable_costs(n, students_f, classes_per_year);

                let annual = net_income_from_revenue(annual_revenue, n, annual_variable);
                let buffered_annual = net_income_from_revenue(buffered_revenue, n, annual_variable);
                let monthly = per_active_month(annual, n.active_months);
                let buffered_monthly = per_active_month(buffered_annual, n.active_months);

                if outcome.manual_net_summary.is_none()
                    && let Some(annual_net) = annual
                {
                    let amounts = spread_annual_net(annual_net, n.working_weeks, n.active_months);
                    outcome.manual_net_summary = Some(ManualNetSummary {
                        annual: annual_net,
                        monthly: amounts.month,
                        weekly: amounts.week,
                        average_weekly: amounts.avg_week,
                        average_monthly: amounts.avg_month,
                    });
                }

                let quote = self.quote(n, price_ex_vat, price_incl_vat, students_f, classes_per_year);
                row.cells.push(PricingCell {
                    classes_per_week,
                    classes_per_year,
                    // The price is fixed, so both variants quote it; the
                    // shortfall shows up in `manual_net`, not in the price.
                    base: quote,
                    buffered: quote,
                    manual_net: Some(ManualNet {
                        annual,
                        monthly,
                        buffered_annual,
                        buffered_monthly,
                    }),
                });
            }

            outcome.table.rows.push(row);
        }
    }

    fn annual_variable_costs(&self, n: &Normalized, students: f64, classes_per_year: f64) -> f64 {
        n.cost_per_class * classes_per_year
            + n.cost_per_student_per_class * students * classes_per_year
            + n.cost_per_student_per_month * students * n.active_months
    }

    fn quote(
        &self,
        n: &Normalized,
        price_ex_vat: f64,
        price_incl_vat: f64,
        students: f64,
        classes_per_year: f64,
    ) -> PriceQuote {
        let breakdown = self.breakdown(n, price_ex_vat, price_incl_vat, students, classes_per_year);
        let annual_net = finite(breakdown.per_lesson.net_income * classes_per_year);
        let monthly_net = per_active_month(annual_net, n.active_months);
        PriceQuote { price_ex_vat, price_incl_vat, breakdown, annual_net, monthly_net }
    }

    /// Decomposes one lesson's revenue at the given price into VAT, variable
    /// costs, fixed-cost allocation, income tax, and net income, both per
    /// lesson and per student.
    fn breakdown(
        &self,
        n: &Normalized,
        price_ex_vat: f64,
        price_incl_vat: f64,
        students: f64,
        classes_per_year: f64,
    ) -> CostBreakdown {
        let price_ex_vat = finite_or(price_ex_vat, 0.0);
        let price_incl_vat = finite_or(price_incl_vat, 0.0);
        let students = finite_or(students, 0.0);
        let classes_per_year = finite_or(classes_per_year, 0.0);
        let safe_students = if students > 0.0 { students } else { 1.0 };

        let fixed_per_lesson = if classes_per_year > 0.0 {
            n.fixed_costs / classes_per_year
        } else {
            0.0
        };
        let vat_per_student = price_incl_vat - price_ex_vat;
        let vat_per_lesson = vat_per_student * students;

        let monthly_cost_annual = n.cost_per_student_per_month * students * n.active_months;
        let monthly_cost_per_lesson = if classes_per_year > 0.0 {
            monthly_cost_annual / classes_per_year
        } else {
            0.0
        };
        let variable_per_lesson =
            n.cost_per_class + n.cost_per_student_per_class * students + monthly_cost_per_lesson;

        let revenue_ex_vat_per_lesson = price_ex_vat * students;
        let profit_before_tax = revenue_ex_vat_per_lesson - variable_per_lesson - fixed_per_lesson;
        let income_tax = if profit_before_tax > 0.0 {
            profit_before_tax * n.tax_rate
        } else {
            0.0
        };
        let net_income = profit_before_tax - income_tax;

        CostBreakdown {
            per_lesson: MoneySplit {
                vat: vat_per_lesson,
                variable_costs: variable_per_lesson,
                fixed_cost_allocation: fixed_per_lesson,
                income_tax,
                net_income,
            },
            per_student: MoneySplit {
                vat: vat_per_student,
                variable_costs: variable_per_lesson / safe_students,
                fixed_cost_allocation: fixed_per_lesson / safe_students,
                income_tax: income_tax / safe_students,
                net_income: net_income / safe_students,
            },
            totals: BreakdownTotals {
                price_incl_vat_per_student: price_incl_vat,
                price_ex_vat_per_student: price_ex_vat,
                price_incl_vat_per_lesson: price_incl_vat * students,
                price_ex_vat_per_lesson: revenue_ex_vat_per_lesson,
                students,
                classes_per_year,
            },
        }
    }
}

/// Annual net income from annual ex-VAT revenue. Tax applies only to
/// positive profit; a loss passes through untaxed. `None` for non-finite
/// revenue.
fn net_income_from_revenue(revenue: f64, n: &Normalized, variable_costs: f64) -> Option<f64> {
    if !revenue.is_finite() {
        return None;
    }
    let profit_before_tax = revenue - n.fixed_costs - finite_or(variable_costs, 0.0);
    if profit_before_tax > 0.0 {
        Some(profit_before_tax * (1.0 - n.tax_rate))
    } else {
        Some(profit_before_tax)
    }
}

fn per_active_month(annual: Option<f64>, active_months: f64) -> Option<f64> {
    annual.and_then(|value| (active_months > 0.0).then(|| value / active_months))
}

/// Finds the cell closest to an arbitrary (students, classes-per-week)
/// request, which need not be present in the table.
///
/// Cells are scored by `|Δstudents| + |Δclasses| / 10` — classes-per-week
/// granularity is finer, so its distance weighs ten times less. The lowest
/// score wins; on a tie the cell encountered first in row-then-column order
/// is kept. Returns `None` for an empty table (or non-finite targets, which
/// can never score).
pub fn find_best_combination(
    table: &PricingTable,
    students_target: f64,
    classes_per_week_target: f64,
) -> Option<BestMatch> {
    let mut best: Option<(f64, f64, f64, BestMatch)> = None;

    for (row_index, row) in table.rows.iter().enumerate() {
        for (cell_index, cell) in row.cells.iter().enumerate() {
            let student_diff = (f64::from(row.students) - students_target).abs();
            let class_diff = (f64::from(cell.classes_per_week) - classes_per_week_target).abs();
            let score = student_diff + class_diff / 10.0;

            // Strict `<` keeps the first cell on ties; NaN scores never win.
            if best.as_ref().is_none_or(|(best_score, ..)| score < *best_score) && score.is_finite()
            {
                best = Some((
                    score,
                    student_diff,
                    class_diff,
                    BestMatch {
                        row: row_index,
                        cell: cell_index,
                        students: row.students,
                        classes_per_week: cell.classes_per_week,
                        exact_students: student_diff < EXACT_MATCH_TOLERANCE,
                        exact_classes: class_diff < EXACT_MATCH_TOLERANCE,
                    },
                ));
            }
        }
    }

    best.map(|(_, _, _, found)| found)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    /// The worked target-mode example: 50k net target, 40% tax, 21% VAT,
    /// 6k fixed costs, 15% buffer, 48 working weeks, 10 active months.
    fn target_inputs() -> PricingInputs {
        PricingInputs {
            mode: PricingMode::Target { target_net_annual: 50000.0 },
            tax_rate: 0.40,
            vat_rate: 0.21,
            fixed_costs_annual: 6000.0,
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
        }
    }

    fn lesson_inputs() -> PricingInputs {
        PricingInputs {
            mode: PricingMode::Lesson { price_incl_vat: 25.0 },
            tax_rate: 0.40,
            vat_rate: 0.21,
            fixed_costs_annual: 6000.0,
            variable_cost_per_class: 0.0,
            variable_cost_per_student_per_class: 0.0,
            variable_cost_per_student_per_month: 0.0,
            classes_per_week: vec![3],
            students_per_class: vec![5],
            hours_per_lesson: 1.0,
            buffer_rate: 0.10,
            working_weeks_per_year: 48.0,
            active_months_per_year: 10.0,
            currency_symbol: "€".to_string(),
        }
    }

    // =========================================================================
    // target mode
    // =========================================================================

    #[test]
    fn target_mode_reports_required_revenue() {
        let outcome = PricingEngine::new(target_inputs()).compute();

        // 50000 / 0.6 + 6000
        assert_close(outcome.revenue_needed.unwrap(), 89333.33, 0.01);
        assert_eq!(outcome.mode, PricingModeKind::Target);
    }

    #[test]
    fn target_mode_prices_match_reference_example() {
        let outcome = PricingEngine::new(target_inputs()).compute();
        let cell = &outcome.table.rows[0].cells[0];

        assert_close(cell.classes_per_year, 96.0, 1e-9);
        assert_close(cell.base.price_ex_vat, 232.64, 0.01);
        assert_close(cell.base.price_incl_vat, 281.49, 0.5);
        assert_close(cell.buffered.price_incl_vat, 323.71, 0.5);
    }

    #[test]
    fn target_mode_vat_relation_holds_for_every_cell() {
        let mut inputs = target_inputs();
        inputs.classes_per_week = vec![1, 2, 3];
        inputs.students_per_class = vec![2, 4, 6];
        let outcome = PricingEngine::new(inputs).compute();

        for (_, cell) in outcome.table.iter_cells() {
            assert_close(cell.base.price_incl_vat, cell.base.price_ex_vat * 1.21, 1e-9);
            assert_close(
                cell.buffered.price_incl_vat,
                cell.buffered.price_ex_vat * 1.21,
                1e-9,
            );
        }
    }

    #[test]
    fn target_mode_annual_net_approximates_the_target() {
        let outcome = PricingEngine::new(target_inputs()).compute();
        let cell = &outcome.table.rows[0].cells[0];

        // Rounding drift against the 50000 target is expected; it must
        // still land within a currency unit here.
        assert_close(cell.base.annual_net.unwrap(), 50000.0, 1.0);
        assert_close(cell.base.monthly_net.unwrap(), 5000.0, 0.1);
    }

    #[test]
    fn buffered_breakdown_is_recomputed_not_scaled() {
        let outcome = PricingEngine::new(target_inputs()).compute();
        let cell = &outcome.table.rows[0].cells[0];

        // The buffered price is 15% higher, but net income grows by more
        // than 15%: fixed costs do not scale with price.
        let base_net = cell.base.breakdown.per_lesson.net_income;
        let buffered_net = cell.buffered.breakdown.per_lesson.net_income;
        assert!(buffered_net > base_net * 1.15);

        // VAT share scales exactly with the price.
        assert_close(
            cell.buffered.breakdown.per_student.vat,
            cell.base.breakdown.per_student.vat * 1.15,
            1e-9,
        );
    }

    #[test]
    fn variable_costs_flow_into_the_price() {
        let mut inputs = target_inputs();
        inputs.variable_cost_per_class = 10.0;
        inputs.variable_cost_per_student_per_class = 2.0;
        inputs.variable_cost_per_student_per_month = 5.0;
        let outcome = PricingEngine::new(inputs).compute();
        let cell = &outcome.table.rows[0].cells[0];

        // variable = 10×96 + 2×4×96 + 5×4×10 = 960 + 768 + 200 = 1928
        // price = (89333.33 + 1928) / 96 / 4 ≈ 237.66
        assert_close(cell.base.price_ex_vat, 237.66, 0.01);
    }

    #[test]
    fn zero_target_with_fixed_costs_still_produces_prices() {
        let mut inputs = target_inputs();
        inputs.mode = PricingMode::Target { target_net_annual: 0.0 };
        let outcome = PricingEngine::new(inputs).compute();

        // Revenue need collapses to fixed costs only.
        assert_close(outcome.revenue_needed.unwrap(), 6000.0, 1e-9);
        assert!(!outcome.table.is_empty());
    }

    #[test]
    fn zero_target_and_zero_costs_yield_empty_table() {
        let mut inputs = target_inputs();
        inputs.mode = PricingMode::Target { target_net_annual: 0.0 };
        inputs.fixed_costs_annual = 0.0;
        let outcome = PricingEngine::new(inputs).compute();

        assert!(outcome.table.is_empty());
        assert_eq!(outcome.revenue_needed, Some(0.0));
    }

    // =========================================================================
    // lesson mode
    // =========================================================================

    #[test]
    fn lesson_mode_net_matches_reference_example() {
        let outcome = PricingEngine::new(lesson_inputs()).compute();
        let cell = &outcome.table.rows[0].cells[0];
        let manual = cell.manual_net.unwrap();

        // price ex VAT = 25 / 1.21 ≈ 20.66; revenue = 20.66 × 5 × 144
        assert_close(cell.base.price_ex_vat, 20.66, 0.01);
        assert_close(cell.classes_per_year, 144.0, 1e-9);
        assert_close(manual.annual.unwrap(), 5325.62, 0.05);

        // 90% attendance: revenue 13388.43, profit 7388.43, net 4433.06
        assert_close(manual.buffered_annual.unwrap(), 4433.06, 0.05);
        assert!(manual.buffered_annual.unwrap() < manual.annual.unwrap());
    }

    #[test]
    fn lesson_mode_price_is_fixed_across_combinations() {
        let mut inputs = lesson_inputs();
        inputs.classes_per_week = vec![1, 3, 5];
        inputs.students_per_class = vec![2, 5, 9];
        let outcome = PricingEngine::new(inputs).compute();

        for (_, cell) in outcome.table.iter_cells() {
            assert_eq!(cell.base.price_incl_vat, 25.0);
            assert_eq!(cell.buffered.price_incl_vat, 25.0);
        }
    }

    #[test]
    fn lesson_mode_summary_uses_first_combination_in_order() {
        let mut inputs = lesson_inputs();
        inputs.classes_per_week = vec![3, 1];
        inputs.students_per_class = vec![5, 2];
        let outcome = PricingEngine::new(inputs).compute();

        // Rows ascend by students, columns keep input order: the first
        // combination is (2 students, 3 classes/week). First finite hit
        // wins, by policy, even though later cells earn more.
        let summary = outcome.manual_net_summary.unwrap();
        let first = outcome.table.rows[0].cells[0].manual_net.unwrap();
        assert_eq!(outcome.table.rows[0].students, 2);
        assert_eq!(outcome.table.rows[0].cells[0].classes_per_week, 3);
        assert_eq!(summary.annual, first.annual.unwrap());
    }

    #[test]
    fn lesson_mode_summary_spreads_across_bases() {
        let outcome = PricingEngine::new(lesson_inputs()).compute();
        let summary = outcome.manual_net_summary.unwrap();

        assert_close(summary.weekly.unwrap(), summary.annual / 48.0, 1e-9);
        assert_close(summary.monthly.unwrap(), summary.annual / 10.0, 1e-9);
        assert_close(summary.average_weekly, summary.annual / 52.0, 1e-9);
        assert_close(summary.average_monthly, summary.annual / 12.0, 1e-9);
    }

    #[test]
    fn lesson_mode_loss_is_not_taxed_and_not_clamped() {
        let mut inputs = lesson_inputs();
        inputs.mode = PricingMode::Lesson { price_incl_vat: 1.0 };
        let outcome = PricingEngine::new(inputs).compute();
        let manual = outcome.table.rows[0].cells[0].manual_net.unwrap();

        // revenue = (1/1.21) × 5 × 144 ≈ 595.04, well under 6000 fixed:
        // the loss carries through without tax relief.
        let annual = manual.annual.unwrap();
        assert!(annual < 0.0);
        assert_close(annual, 595.04 - 6000.0, 0.05);
    }

    #[test]
    fn lesson_mode_full_buffer_forfeits_all_revenue() {
        let mut inputs = lesson_inputs();
        inputs.buffer_rate = 1.5;
        let outcome = PricingEngine::new(inputs).compute();
        let manual = outcome.table.rows[0].cells[0].manual_net.unwrap();

        // Attendance multiplier floors at zero rather than going negative.
        assert_close(manual.buffered_annual.unwrap(), -6000.0, 1e-6);
    }

    #[test]
    fn target_mode_has_no_manual_summary() {
        let outcome = PricingEngine::new(target_inputs()).compute();

        assert_eq!(outcome.manual_net_summary, None);
        assert_eq!(outcome.table.rows[0].cells[0].manual_net, None);
    }

    // =========================================================================
    // degenerate schedules
    // =========================================================================

    #[test]
    fn empty_classes_list_yields_empty_table() {
        let mut inputs = target_inputs();
        inputs.classes_per_week = vec![];
        let outcome = PricingEngine::new(inputs).compute();

        assert!(outcome.table.is_empty());
        assert_eq!(outcome.revenue_needed, None);
    }

    #[test]
    fn empty_students_list_yields_empty_table() {
        let mut inputs = lesson_inputs();
        inputs.students_per_class = vec![];
        let outcome = PricingEngine::new(inputs).compute();

        assert!(outcome.table.is_empty());
        assert_eq!(outcome.manual_net_summary, None);
    }

    #[test]
    fn zero_working_weeks_yields_empty_table() {
        let mut inputs = target_inputs();
        inputs.working_weeks_per_year = 0.0;
        let outcome = PricingEngine::new(inputs).compute();

        assert!(outcome.table.is_empty());
    }

    #[test]
    fn zero_active_months_drops_monthly_figures_only() {
        let mut inputs = target_inputs();
        inputs.active_months_per_year = 0.0;
        let outcome = PricingEngine::new(inputs).compute();
        let cell = &outcome.table.rows[0].cells[0];

        assert!(cell.base.annual_net.is_some());
        assert_eq!(cell.base.monthly_net, None);
    }

    // =========================================================================
    // table shape and purity
    // =========================================================================

    #[test]
    fn rows_ascend_by_students_and_columns_keep_input_order() {
        let mut inputs = target_inputs();
        inputs.students_per_class = vec![8, 2, 5];
        inputs.classes_per_week = vec![3, 1];
        let outcome = PricingEngine::new(inputs).compute();

        let students: Vec<u32> = outcome.table.rows.iter().map(|r| r.students).collect();
        assert_eq!(students, vec![2, 5, 8]);
        let classes: Vec<u32> = outcome.table.rows[0]
            .cells
            .iter()
            .map(|c| c.classes_per_week)
            .collect();
        assert_eq!(classes, vec![3, 1]);
    }

    #[test]
    fn identical_inputs_produce_identical_outcomes() {
        let inputs = target_inputs();
        let first = PricingEngine::new(inputs.clone()).compute();
        let second = PricingEngine::new(inputs).compute();

        assert_eq!(first, second);
    }

    #[test]
    fn prices_costs_and_vat_are_non_negative() {
        let mut inputs = target_inputs();
        inputs.classes_per_week = vec![1, 2, 4];
        inputs.students_per_class = vec![1, 3, 7];
        inputs.variable_cost_per_class = 3.0;
        inputs.variable_cost_per_student_per_month = 1.5;
        let outcome = PricingEngine::new(inputs).compute();

        for (_, cell) in outcome.table.iter_cells() {
            for quote in [&cell.base, &cell.buffered] {
                assert!(quote.price_ex_vat >= 0.0);
                assert!(quote.price_incl_vat >= 0.0);
                assert!(quote.breakdown.per_lesson.vat >= 0.0);
                assert!(quote.breakdown.per_lesson.variable_costs >= 0.0);
                assert!(quote.breakdown.per_lesson.fixed_cost_allocation >= 0.0);
                assert!(quote.breakdown.per_lesson.income_tax >= 0.0);
            }
        }
    }

    // =========================================================================
    // best-match lookup
    // =========================================================================

    fn grid_outcome() -> PricingOutcome {
        let mut inputs = target_inputs();
        inputs.students_per_class = vec![2, 4, 6];
        inputs.classes_per_week = vec![1, 2, 3];
        PricingEngine::new(inputs).compute()
    }

    #[test]
    fn best_match_finds_exact_combination() {
        let outcome = grid_outcome();

        let found = find_best_combination(&outcome.table, 4.0, 2.0).unwrap();
        assert_eq!(found.students, 4);
        assert_eq!(found.classes_per_week, 2);
        assert!(found.exact_students);
        assert!(found.exact_classes);
    }

    #[test]
    fn best_match_prefers_student_axis() {
        let outcome = grid_outcome();

        // (5, 1): students are off by 1 either way, classes decide.
        let found = find_best_combination(&outcome.table, 5.0, 1.0).unwrap();
        assert_eq!(found.students, 4);
        assert_eq!(found.classes_per_week, 1);
        assert!(!found.exact_students);
        assert!(found.exact_classes);
    }

    #[test]
    fn best_match_tie_keeps_first_in_iteration_order() {
        let outcome = grid_outcome();

        // (3, 2) is equidistant from students 2 and 4; the earlier row wins.
        let found = find_best_combination(&outcome.table, 3.0, 2.0).unwrap();
        assert_eq!(found.students, 2);
        assert_eq!(found.classes_per_week, 2);
    }

    #[test]
    fn best_match_on_empty_table_is_none() {
        let table = PricingTable::default();

        assert_eq!(find_best_combination(&table, 4.0, 2.0), None);
    }

    #[test]
    fn best_match_with_non_finite_target_is_none() {
        let outcome = grid_outcome();

        assert_eq!(find_best_combination(&outcome.table, f64::NAN, 2.0), None);
    }
}
