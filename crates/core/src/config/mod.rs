//! Configuration loading and schema definitions
//!
//! Search, dictionary and logging settings read from `kondate.toml`.

mod loader;
mod schema;

pub use loader::{Config, MAX_DEBOUNCE_MS};
pub use schema::*;
