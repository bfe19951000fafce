//! CLI command implementations.

mod check;
mod format;

pub use check::{CheckArgs, run_check};
pub use format::{FormatArgs, run_format};
