pub mod calculations;
pub mod models;

pub use calculations::convert::{IncomeBasis, LockedGrossCache, NetBasisAmounts};
pub use calculations::engine::{PricingEngine, PricingOutcome, find_best_combination};
pub use models::*;
