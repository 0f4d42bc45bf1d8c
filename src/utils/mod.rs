//! Shared utilities.

mod decimal;

pub use decimal::{exceeds_abs, round_to_precision, to_percentage};
