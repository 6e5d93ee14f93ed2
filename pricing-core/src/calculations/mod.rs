//! Pricing and conversion calculations.
//!
//! `convert` holds the stateless unit conversions (gross/net, time bases);
//! `engine` holds the dual-mode pricing computation; `common` the numeric
//! helpers shared by both.

pub mod common;
pub mod convert;
pub mod engine;
