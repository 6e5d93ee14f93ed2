//! Plain-text rendering of a pricing outcome.
//!
//! Target mode prints the per-student lesson price grid (buffered price in
//! parentheses); lesson mode prints two monthly net income grids, one at
//! full attendance and one under the configured shortfall, each with the
//! annual figure in parentheses. Whole-unit rounding happens here only.

use std::fmt::Write;

use pricing_core::{PricingInputs, PricingModeKind, PricingOutcome};

use crate::utils::{format_currency, format_currency_detailed, format_trimmed};

const CELL_WIDTH: usize = 22;

/// Renders the full outcome as a text block ready for stdout.
pub fn render_outcome(outcome: &PricingOutcome, inputs: &PricingInputs) -> String {
    let mut out = String::new();
    let symbol = inputs.currency_symbol.as_str();

    if outcome.table.is_empty() {
        out.push_str("No valid schedule: add at least one class-size and classes-per-week value");
        if outcome.revenue_needed.is_some_and(|revenue| revenue <= 0.0) {
            out.push_str(" and a positive income target or fixed costs");
        }
        out.push_str(".\n");
        return out;
    }

    match outcome.mode {
        PricingModeKind::Target => {
            if let Some(revenue) = outcome.revenue_needed {
                let _ = writeln!(
                    out,
                    "Required annual revenue (ex VAT): {}",
                    format_currency(symbol, revenue)
                );
            }
            let _ = writeln!(
                out,
                "Per-student lesson price incl VAT, buffered +{}% in parentheses:\n",
                format_trimmed(outcome.buffer_percent, 1)
            );
            render_grid(&mut out, outcome, |cell| {
                format!(
                    "{} ({})",
                    format_currency(symbol, cell.base.price_incl_vat),
                    format_currency(symbol, cell.buffered.price_incl_vat),
                )
            });
        }
        PricingModeKind::Lesson => {
            if let Some(cell) = outcome.table.rows.first().and_then(|row| row.cells.first()) {
                let _ = writeln!(
                    out,
                    "Lesson price: {} incl VAT ({} ex VAT)",
                    format_currency_detailed(symbol, cell.base.price_incl_vat),
                    format_currency_detailed(symbol, cell.base.price_ex_vat),
                );
            }
            out.push_str("Monthly net income (annual in parentheses), full attendance:\n\n");
            render_grid(&mut out, outcome, |cell| {
                manual_net_cell(cell, symbol, Variant::Full)
            });
            let _ = writeln!(
                out,
                "\nWith {}% attendance shortfall:\n",
                format_trimmed(outcome.buffer_percent, 1)
            );
            render_grid(&mut out, outcome, |cell| {
                manual_net_cell(cell, symbol, Variant::Shortfall)
            });
            if let Some(summary) = &outcome.manual_net_summary {
                let monthly = summary
                    .monthly
                    .map_or_else(|| "—".to_string(), |value| format_currency(symbol, value));
                let _ = writeln!(
                    out,
                    "\nFirst combination: {} net per year, {} per active month.",
                    format_currency(symbol, summary.annual),
                    monthly,
                );
            }
        }
    }

    out
}

#[derive(Clone, Copy)]
enum Variant {
    Full,
    Shortfall,
}

fn manual_net_cell(cell: &pricing_core::PricingCell, symbol: &str, variant: Variant) -> String {
    let manual = match cell.manual_net {
        Some(manual) => manual,
        None => return "—".to_string(),
    };
    let (monthly, annual) = match variant {
        Variant::Full => (manual.monthly, manual.annual),
        Variant::Shortfall => (manual.buffered_monthly, manual.buffered_annual),
    };
    let monthly = monthly.map_or_else(|| "—".to_string(), |value| format_currency(symbol, value));
    let annual = annual.map_or_else(|| "—".to_string(), |value| format_currency(symbol, value));
    format!("{monthly} ({annual})")
}

fn render_grid(
    out: &mut String,
    outcome: &PricingOutcome,
    format_cell: impl Fn(&pricing_core::PricingCell) -> String,
) {
    let first_row = match outcome.table.rows.first() {
        Some(row) => row,
        None => return,
    };

    let _ = write!(out, "{:>12}", "students");
    for cell in &first_row.cells {
        let header = format!("{}x/week", cell.classes_per_week);
        let _ = write!(out, "{:>width$}", header, width = CELL_WIDTH);
    }
    out.push('\n');

    for row in &outcome.table.rows {
        let _ = write!(out, "{:>12}", row.students);
        for cell in &row.cells {
            let rendered = format_cell(cell);
            let _ = write!(out, "{:>width$}", rendered, width = CELL_WIDTH);
        }
        out.push('\n');
    }
}
