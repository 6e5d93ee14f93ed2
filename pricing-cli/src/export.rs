//! CSV export of pricing results.
//!
//! Produces one flat row per (variant, students, classes-per-week)
//! combination. Column sets differ per mode:
//!
//! - target mode: `Variant,Students,Classes per week,Classes per year,
//!   Price incl VAT,Price ex VAT`
//! - lesson mode: `Variant,Students,Classes per week,Classes per year,
//!   Monthly net income,Annual net income`
//!
//! Monetary values are rounded to whole currency units here and only here;
//! the engine supplies exact figures.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use pricing_core::{PricingModeKind, PricingOutcome};
use serde::Serialize;
use thiserror::Error;

use crate::utils::format_trimmed;

/// Errors that can occur while writing a CSV export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct TargetModeRow {
    #[serde(rename = "Variant")]
    variant: String,
    #[serde(rename = "Students")]
    students: u32,
    #[serde(rename = "Classes per week")]
    classes_per_week: u32,
    #[serde(rename = "Classes per year")]
    classes_per_year: i64,
    #[serde(rename = "Price incl VAT")]
    price_incl_vat: i64,
    #[serde(rename = "Price ex VAT")]
    price_ex_vat: i64,
}

#[derive(Debug, Serialize)]
struct LessonModeRow {
    #[serde(rename = "Variant")]
    variant: String,
    #[serde(rename = "Students")]
    students: u32,
    #[serde(rename = "Classes per week")]
    classes_per_week: u32,
    #[serde(rename = "Classes per year")]
    classes_per_year: i64,
    #[serde(rename = "Monthly net income")]
    monthly_net: Option<i64>,
    #[serde(rename = "Annual net income")]
    annual_net: Option<i64>,
}

/// Writes the outcome as CSV to any writer.
pub fn write_csv<W: Write>(writer: W, outcome: &PricingOutcome) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let buffer_label = format_trimmed(outcome.buffer_percent, 1);

    match outcome.mode {
        PricingModeKind::Target => {
            let buffered_variant = format!("Buffered +{buffer_label}%");
            for (row, cell) in outcome.table.iter_cells() {
                csv_writer.serialize(TargetModeRow {
                    variant: "Base (no buffer)".to_string(),
                    students: row.students,
                    classes_per_week: cell.classes_per_week,
                    classes_per_year: round_whole(cell.classes_per_year),
                    price_incl_vat: round_whole(cell.base.price_incl_vat),
                    price_ex_vat: round_whole(cell.base.price_ex_vat),
                })?;
                csv_writer.serialize(TargetModeRow {
                    variant: buffered_variant.clone(),
                    students: row.students,
                    classes_per_week: cell.classes_per_week,
                    classes_per_year: round_whole(cell.classes_per_year),
                    price_incl_vat: round_whole(cell.buffered.price_incl_vat),
                    price_ex_vat: round_whole(cell.buffered.price_ex_vat),
                })?;
            }
        }
        PricingModeKind::Lesson => {
            let buffered_variant = format!("With {buffer_label}% shortfall");
            for (row, cell) in outcome.table.iter_cells() {
                let manual = cell.manual_net.unwrap_or(pricing_core::ManualNet {
                    annual: None,
                    monthly: None,
                    buffered_annual: None,
                    buffered_monthly: None,
                });
                csv_writer.serialize(LessonModeRow {
                    variant: "Full attendance".to_string(),
                    students: row.students,
                    classes_per_week: cell.classes_per_week,
                    classes_per_year: round_whole(cell.classes_per_year),
                    monthly_net: manual.monthly.map(round_whole),
                    annual_net: manual.annual.map(round_whole),
                })?;
                csv_writer.serialize(LessonModeRow {
                    variant: buffered_variant.clone(),
                    students: row.students,
                    classes_per_week: cell.classes_per_week,
                    classes_per_year: round_whole(cell.classes_per_year),
                    monthly_net: manual.buffered_monthly.map(round_whole),
                    annual_net: manual.buffered_annual.map(round_whole),
                })?;
            }
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes the outcome as CSV to a file.
pub fn write_csv_file(path: &Path, outcome: &PricingOutcome) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(file, outcome)
}

fn round_whole(value: f64) -> i64 {
    value.round() as i64
}
