//! Working-time calendar derived from planned time off.
//!
//! Instructors describe their availability as time *off* (months per year,
//! weeks per four-week cycle, days per week); the calendar converts that into
//! the active months and working weeks the pricing engine divides by.

use serde::{Deserialize, Serialize};

use crate::calculations::common::{MONTHS_PER_YEAR, WEEKS_PER_YEAR};

const BASE_WORK_DAYS_PER_WEEK: f64 = 7.0;
const WEEKS_PER_CYCLE: f64 = 4.0;

/// Planned time off, clamped to sensible bounds on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendar {
    months_off: f64,
    weeks_off_per_cycle: f64,
    days_off_per_week: f64,
}

impl WorkCalendar {
    /// Creates a calendar from raw time-off figures.
    ///
    /// Values are clamped: months off to `[0, 12]`, weeks off per four-week
    /// cycle to `[0, 4]`, days off per week to `[0, 7]`. Non-finite values
    /// collapse to zero time off.
    pub fn new(months_off: f64, weeks_off_per_cycle: f64, days_off_per_week: f64) -> Self {
        Self {
            months_off: clamp_or_zero(months_off, MONTHS_PER_YEAR),
            weeks_off_per_cycle: clamp_or_zero(weeks_off_per_cycle, WEEKS_PER_CYCLE),
            days_off_per_week: clamp_or_zero(days_off_per_week, BASE_WORK_DAYS_PER_WEEK),
        }
    }

    pub fn months_off(&self) -> f64 {
        self.months_off
    }

    pub fn weeks_off_per_cycle(&self) -> f64 {
        self.weeks_off_per_cycle
    }

    pub fn days_off_per_week(&self) -> f64 {
        self.days_off_per_week
    }

    /// Fraction of the year the instructor is active, in `[0, 1]`.
    pub fn active_month_share(&self) -> f64 {
        ((MONTHS_PER_YEAR - self.months_off) / MONTHS_PER_YEAR).clamp(0.0, 1.0)
    }

    /// Months per year with any teaching activity.
    pub fn active_months(&self) -> f64 {
        MONTHS_PER_YEAR * self.active_month_share()
    }

    /// Weeks per year actually worked, after both month-level and
    /// cycle-level time off.
    pub fn working_weeks(&self) -> f64 {
        let weeks_share =
            ((WEEKS_PER_CYCLE - self.weeks_off_per_cycle) / WEEKS_PER_CYCLE).clamp(0.0, 1.0);
        WEEKS_PER_YEAR * self.active_month_share() * weeks_share
    }

    pub fn working_days_per_week(&self) -> f64 {
        (BASE_WORK_DAYS_PER_WEEK - self.days_off_per_week).clamp(0.0, BASE_WORK_DAYS_PER_WEEK)
    }

    pub fn working_days_per_year(&self) -> f64 {
        self.working_weeks() * self.working_days_per_week()
    }
}

impl Default for WorkCalendar {
    /// The defaults the original calculator ships with: two months off, one
    /// week off per cycle, two days off per week.
    fn default() -> Self {
        Self::new(2.0, 1.0, 2.0)
    }
}

fn clamp_or_zero(value: f64, max: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, max) } else { 0.0 }
}
