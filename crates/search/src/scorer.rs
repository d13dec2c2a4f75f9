//! Ingredient match scoring.
//!
//! A recipe's score is the number of its non-seasoning ingredients that are
//! in the user's pantry selection. Each ingredient counts once; quantities
//! are not compared.

use kondate_core::model::{Recipe, SelectedIngredient};
use std::collections::HashSet;

/// Pantry selection prepared for scoring many recipes.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: HashSet<i64>,
}

impl Selection {
    pub fn new(selected: &[SelectedIngredient]) -> Self {
        Self {
            ids: selected.iter().map(|s| s.ingredient_id).collect(),
        }
    }

    pub fn contains(&self, ingredient_id: i64) -> bool {
        self.ids.contains(&ingredient_id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of distinct non-seasoning recipe ingredients in the selection.
    pub fn score(&self, recipe: &Recipe) -> usize {
        if self.ids.is_empty() {
            return 0;
        }
        recipe
            .ingredients
            .iter()
            .filter(|line| !line.unit.is_seasoning())
            .map(|line| line.ingredient_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .filter(|id| self.ids.contains(id))
            .count()
    }
}

/// Score one recipe against a pantry selection.
pub fn score(recipe: &Recipe, selected: &[SelectedIngredient]) -> usize {
    Selection::new(selected).score(recipe)
}
