//! Core types for the kondate recipe search engine
//!
//! This crate provides the pieces shared by the engine and its front ends:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Domain model**: recipes, ingredients, units and pantry selections
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust
//! use kondate_core::model::{Recipe, Review};
//!
//! let mut recipe = Recipe::new(1, "親子丼");
//! recipe.reviews.push(Review { rating: 4.0 });
//! assert_eq!(recipe.average_rating(), 4.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod model;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, MatchMode};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::model::{
        Ingredient, IngredientCatalog, Nutrition, Recipe, RecipeData, RecipeIngredientRef,
        Review, SelectedIngredient, Unit, UnitKind,
    };
}
