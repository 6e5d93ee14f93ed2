mod calendar;
mod inputs;
pub mod schedule;
mod table;

pub use calendar::WorkCalendar;
pub use inputs::{PricingInputs, PricingMode};
pub use schedule::parse_count_list;
pub use table::{
    BestMatch, BreakdownTotals, CostBreakdown, ManualNet, ManualNetSummary, MoneySplit,
    PriceQuote, PricingCell, PricingModeKind, PricingRow, PricingTable,
};
