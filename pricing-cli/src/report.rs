//! Monthly accounting report for one chosen combination.
//!
//! The report answers "what does one active month look like" for a
//! (students, classes-per-week) pair: revenue with and without VAT, the cost
//! split, income tax, net income and margin, plus the effective hourly rate.
//! The pair need not exist in the table; the closest computed combination is
//! used and a note records any substitution.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::Local;
use pricing_core::{PricingInputs, PricingModeKind, PricingOutcome, find_best_combination};
use thiserror::Error;

use crate::utils::{
    escape_html, format_currency_detailed, format_currency_or_dash, format_trimmed,
};

/// Errors that can occur while writing a report to disk.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One month of accounting for a single combination.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountingReport {
    pub mode: PricingModeKind,
    pub students: u32,
    pub classes_per_week: u32,
    pub classes_per_month: f64,
    pub hours_per_month: f64,
    pub hours_per_week: f64,
    pub price_incl_vat: f64,
    pub price_ex_vat: f64,
    pub revenue_incl_vat: f64,
    pub revenue_ex_vat: f64,
    pub vat_remitted: f64,
    pub variable_costs_classes: f64,
    pub variable_costs_students: f64,
    pub variable_costs_monthly: f64,
    pub fixed_costs: f64,
    pub income_tax: f64,
    pub net_income: f64,
    /// Net income as a share of ex-VAT revenue; `None` when revenue is zero.
    pub net_margin: Option<f64>,
    pub hourly_net: Option<f64>,
    pub hourly_gross: Option<f64>,
    pub currency_symbol: String,
    pub notes: Vec<String>,
}

/// Builds the report for the combination closest to the requested pair.
/// Returns `None` when the table is empty.
pub fn build_report(
    inputs: &PricingInputs,
    outcome: &PricingOutcome,
    students: f64,
    classes_per_week: f64,
) -> Option<AccountingReport> {
    let found = find_best_combination(&outcome.table, students, classes_per_week)?;
    let cell = &outcome.table.rows[found.row].cells[found.cell];
    let students_f = f64::from(found.students);

    // Spread the annual schedule over the months actually worked; with no
    // active months configured, fall back to a calendar year.
    let months = if inputs.active_months_per_year > 0.0 {
        inputs.active_months_per_year
    } else {
        12.0
    };
    let classes_per_month = cell.classes_per_year / months;
    let hours_per_month = classes_per_month * inputs.hours_per_lesson;
    let hours_per_week = f64::from(found.classes_per_week) * inputs.hours_per_lesson;

    let quote = &cell.base;
    let revenue_incl_vat = quote.price_incl_vat * students_f * classes_per_month;
    let revenue_ex_vat = quote.price_ex_vat * students_f * classes_per_month;
    let vat_remitted = revenue_incl_vat - revenue_ex_vat;

    let variable_costs_classes = inputs.variable_cost_per_class.max(0.0) * classes_per_month;
    let variable_costs_students =
        inputs.variable_cost_per_student_per_class.max(0.0) * students_f * classes_per_month;
    let variable_costs_monthly =
        inputs.variable_cost_per_student_per_month.max(0.0) * students_f;
    let fixed_costs = inputs.fixed_costs_annual.max(0.0) / months;

    let profit_before_tax = revenue_ex_vat
        - variable_costs_classes
        - variable_costs_students
        - variable_costs_monthly
        - fixed_costs;
    let income_tax = if profit_before_tax > 0.0 {
        profit_before_tax * inputs.tax_rate.clamp(0.0, 0.999)
    } else {
        0.0
    };
    let net_income = profit_before_tax - income_tax;

    let net_margin = (revenue_ex_vat > 0.0).then(|| net_income / revenue_ex_vat);
    let hourly_net = (hours_per_month > 0.0).then(|| net_income / hours_per_month);
    let hourly_gross = (hours_per_month > 0.0).then(|| revenue_ex_vat / hours_per_month);

    let mut notes = Vec::new();
    if !found.exact_students {
        notes.push(format!(
            "No combination with {} students; using the closest computed value ({}).",
            format_trimmed(students, 1),
            found.students
        ));
    }
    if !found.exact_classes {
        notes.push(format!(
            "No combination with {} classes per week; using the closest computed value ({}).",
            format_trimmed(classes_per_week, 1),
            found.classes_per_week
        ));
    }
    match outcome.mode {
        PricingModeKind::Target => notes.push(
            "Prices are the computed base (unbuffered) values for the income target.".to_string(),
        ),
        PricingModeKind::Lesson => {
            notes.push("Prices are the manually set lesson price.".to_string());
        }
    }

    Some(AccountingReport {
        mode: outcome.mode,
        students: found.students,
        classes_per_week: found.classes_per_week,
        classes_per_month,
        hours_per_month,
        hours_per_week,
        price_incl_vat: quote.price_incl_vat,
        price_ex_vat: quote.price_ex_vat,
        revenue_incl_vat,
        revenue_ex_vat,
        vat_remitted,
        variable_costs_classes,
        variable_costs_students,
        variable_costs_monthly,
        fixed_costs,
        income_tax,
        net_income,
        net_margin,
        hourly_net,
        hourly_gross,
        currency_symbol: inputs.currency_symbol.clone(),
        notes,
    })
}

impl AccountingReport {
    /// Renders the report as a standalone HTML document.
    pub fn to_html(&self) -> String {
        let symbol = self.currency_symbol.as_str();
        let money = |value: f64| escape_html(&format_currency_detailed(symbol, value));
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n<title>Monthly accounting report</title>\n");
        html.push_str(
            "<style>body{font-family:sans-serif;max-width:42rem;margin:2rem auto}\
             table{border-collapse:collapse;width:100%}\
             td,th{border:1px solid #ccc;padding:0.4rem;text-align:left}\
             td:last-child{text-align:right}\
             .notes{color:#555;font-size:0.9rem}</style>\n",
        );
        html.push_str("</head>\n<body>\n<h1>Monthly accounting report</h1>\n");

        let _ = writeln!(
            html,
            "<p>{} students, {} classes/week ({} classes, {} hours per active month) — {} mode</p>",
            self.students,
            self.classes_per_week,
            escape_html(&format_trimmed(self.classes_per_month, 1)),
            escape_html(&format_trimmed(self.hours_per_month, 1)),
            self.mode,
        );

        html.push_str("<table>\n");
        let mut row = |label: &str, value: String| {
            let _ = writeln!(html, "<tr><td>{}</td><td>{}</td></tr>", escape_html(label), value);
        };
        row("Lesson price (incl VAT)", money(self.price_incl_vat));
        row("Lesson price (ex VAT)", money(self.price_ex_vat));
        row("Revenue (incl VAT)", money(self.revenue_incl_vat));
        row("Revenue (ex VAT)", money(self.revenue_ex_vat));
        row("VAT to remit", money(self.vat_remitted));
        row("Variable costs, per class", money(self.variable_costs_classes));
        row("Variable costs, per student per class", money(self.variable_costs_students));
        row("Variable costs, per student per month", money(self.variable_costs_monthly));
        row("Fixed costs", money(self.fixed_costs));
        row("Income tax", money(self.income_tax));
        row("Net income", money(self.net_income));
        row(
            "Net margin",
            match self.net_margin {
                Some(margin) => {
                    escape_html(&format!("{}%", format_trimmed(margin * 100.0, 1)))
                }
                None => "—".to_string(),
            },
        );
        row(
            "Effective hourly rate (net)",
            escape_html(&format_currency_or_dash(symbol, self.hourly_net)),
        );
        row(
            "Effective hourly rate (gross, ex VAT)",
            escape_html(&format_currency_or_dash(symbol, self.hourly_gross)),
        );
        html.push_str("</table>\n");

        if !self.notes.is_empty() {
            html.push_str("<ul class=\"notes\">\n");
            for note in &self.notes {
                let _ = writeln!(html, "<li>{}</li>", escape_html(note));
            }
            html.push_str("</ul>\n");
        }

        let _ = writeln!(
            html,
            "<p class=\"notes\">Generated {}</p>",
            Local::now().format("%Y-%m-%d %H:%M")
        );
        html.push_str("</body>\n</html>\n");
        html
    }

    pub fn write_html_file(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, self.to_html())?;
        Ok(())
    }
}
