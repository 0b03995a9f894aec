//! Terminal output helpers for catalog tools
//!
//! - Status messages and error reports
//! - Number and duration formatting
//! - Progress bars for batch runs

#![warn(missing_docs)]

pub mod output;
pub mod progress;
