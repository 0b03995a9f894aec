//! Configuration loading and schema definitions
//!
//! A single TOML file configures search ranking, the listing cache, the
//! category tree and logging. Every key is optional.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
