//! Command-line front end for the course pricing engine.
//!
//! Two modes: by default it solves for the lesson price that meets an annual
//! net income target; with `--lesson-price` it instead solves for the net
//! income a fixed price yields. Results print as a grid and can additionally
//! be exported to CSV (`--csv`) and a monthly accounting report (`--report`).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pricing_core::{
    IncomeBasis, PricingEngine, PricingInputs, PricingMode, WorkCalendar,
    calculations::convert::{annual_from_basis, gross_to_net},
    parse_count_list,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use pricing_cli::{export, render, report};

#[derive(Debug, Parser)]
#[command(name = "course-pricing", version, about = "Pricing calculator for course instructors")]
struct Cli {
    /// Desired net income (ignored when --lesson-price is given)
    #[arg(long, default_value_t = 50000.0)]
    income: f64,

    /// Time basis the --income figure is expressed in
    #[arg(long, value_enum, default_value = "year")]
    basis: BasisArg,

    /// Treat --income as gross (pre-tax) instead of net
    #[arg(long)]
    gross: bool,

    /// Fixed per-student lesson price incl VAT; switches to lesson mode
    #[arg(long)]
    lesson_price: Option<f64>,

    /// Flat income tax rate in percent
    #[arg(long, default_value_t = 40.0)]
    tax: f64,

    /// VAT rate in percent
    #[arg(long, default_value_t = 21.0)]
    vat: f64,

    /// Safety margin in percent (price markup / attendance shortfall)
    #[arg(long, default_value_t = 15.0)]
    buffer: f64,

    /// Annual fixed costs
    #[arg(long, default_value_t = 6000.0)]
    fixed_costs: f64,

    /// Variable cost per class
    #[arg(long, default_value_t = 0.0)]
    cost_per_class: f64,

    /// Variable cost per student per class
    #[arg(long, default_value_t = 0.0)]
    cost_per_student: f64,

    /// Variable cost per student per month
    #[arg(long, default_value_t = 0.0)]
    cost_per_student_monthly: f64,

    /// Class sizes to tabulate, e.g. "1-8" or "2,4,6"
    #[arg(long, default_value = "1-8")]
    students: String,

    /// Classes-per-week values to tabulate, e.g. "1-3" or "1,2,5"
    #[arg(long, default_value = "1-3")]
    classes: String,

    /// Duration of one lesson in hours
    #[arg(long, default_value_t = 1.0)]
    hours: f64,

    /// Months off per year
    #[arg(long, default_value_t = 2.0)]
    months_off: f64,

    /// Weeks off per four-week cycle
    #[arg(long, default_value_t = 1.0)]
    weeks_off_cycle: f64,

    /// Days off per week
    #[arg(long, default_value_t = 2.0)]
    days_off_week: f64,

    /// Currency symbol used in output
    #[arg(long, default_value = "€")]
    currency: String,

    /// Write the result table to this CSV file
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Write a monthly accounting report (HTML) to this file
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Students for the accounting report
    #[arg(long, default_value_t = 4.0)]
    report_students: f64,

    /// Classes per week for the accounting report
    #[arg(long, default_value_t = 2.0)]
    report_classes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BasisArg {
    Year,
    Week,
    Month,
    AvgWeek,
    AvgMonth,
}

impl From<BasisArg> for IncomeBasis {
    fn from(value: BasisArg) -> Self {
        match value {
            BasisArg::Year => IncomeBasis::Year,
            BasisArg::Week => IncomeBasis::Week,
            BasisArg::Month => IncomeBasis::Month,
            BasisArg::AvgWeek => IncomeBasis::AvgWeek,
            BasisArg::AvgMonth => IncomeBasis::AvgMonth,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

/// Turns CLI percentages and schedule strings into the engine's input record.
fn build_inputs(cli: &Cli) -> PricingInputs {
    let calendar = WorkCalendar::new(cli.months_off, cli.weeks_off_cycle, cli.days_off_week);
    let working_weeks = calendar.working_weeks();
    let active_months = calendar.active_months();
    debug!(working_weeks, active_months, "derived schedule from calendar");

    let tax_rate = (cli.tax / 100.0).clamp(0.0, 0.999);

    let mode = match cli.lesson_price {
        Some(price) => PricingMode::Lesson { price_incl_vat: price },
        None => {
            // The engine always works in annual net terms; gross figures and
            // non-annual bases are converted once, here at the boundary.
            let net = if cli.gross {
                gross_to_net(cli.income, tax_rate).unwrap_or(0.0)
            } else {
                cli.income
            };
            let annual = annual_from_basis(cli.basis.into(), net, working_weeks, active_months)
                .unwrap_or(net);
            PricingMode::Target { target_net_annual: annual }
        }
    };

    PricingInputs {
        mode,
        tax_rate,
        vat_rate: (cli.vat / 100.0).max(0.0),
        fixed_costs_annual: cli.fixed_costs,
        variable_cost_per_class: cli.cost_per_class,
        variable_cost_per_student_per_class: cli.cost_per_student,
        variable_cost_per_student_per_month: cli.cost_per_student_monthly,
        classes_per_week: parse_count_list(&cli.classes),
        students_per_class: parse_count_list(&cli.students),
        hours_per_lesson: cli.hours.clamp(0.25, 12.0),
        buffer_rate: (cli.buffer / 100.0).max(0.0),
        working_weeks_per_year: working_weeks,
        active_months_per_year: active_months,
        currency_symbol: cli.currency.clone(),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let inputs = build_inputs(cli);
    let outcome = PricingEngine::new(inputs.clone()).compute();

    print!("{}", render::render_outcome(&outcome, &inputs));

    if let Some(path) = &cli.csv {
        export::write_csv_file(path, &outcome)
            .with_context(|| format!("writing CSV to {}", path.display()))?;
        println!("CSV written to {}", path.display());
    }

    if let Some(path) = &cli.report {
        let report =
            report::build_report(&inputs, &outcome, cli.report_students, cli.report_classes)
                .context("no combinations to report on; check --students and --classes")?;
        report
            .write_html_file(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
