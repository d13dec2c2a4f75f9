//! WASM bindings for the browser search field.
//!
//! Everything here resolves without suspending; JSON goes in and out.

use crate::matcher::MatchResult;
use kondate_core::model::{Recipe, SelectedIngredient};
use wasm_bindgen::prelude::*;

/// Canonical hiragana form of `text`.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    crate::default_matcher().normalizer().normalize(text).into_string()
}

/// Reading-aware match; falls back to character folding on failure.
#[wasm_bindgen]
pub fn matches_query(query: &str, target: &str) -> bool {
    let MatchResult { matched, .. } = crate::default_matcher().match_now(query, target);
    matched
}

/// Character-folding match.
#[wasm_bindgen]
pub fn matches_query_sync(query: &str, target: &str) -> bool {
    crate::matches_search_query_sync(query, target)
}

/// Sort recipes given as JSON.
///
/// # Arguments
/// * `recipes_json` - JSON array of recipes
/// * `sort_by` - Sort key name, e.g. `cost_asc`
/// * `selected_json` - JSON array of `{ingredient_id, quantity}`; may be empty
///
/// # Returns
/// JSON array of the recipes in ranked order, `[]` if the input is malformed
#[wasm_bindgen]
pub fn sort_recipes_json(recipes_json: &str, sort_by: &str, selected_json: &str) -> String {
    let Ok(recipes) = serde_json::from_str::<Vec<Recipe>>(recipes_json) else {
        return "[]".to_string();
    };
    let selected: Vec<SelectedIngredient> = if selected_json.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(selected_json).unwrap_or_default()
    };

    let ranked = crate::sort_recipes(&recipes, sort_by, &selected);
    serde_json::to_string(&ranked).unwrap_or_else(|_| "[]".to_string())
}

/// Indices of matching candidates, as a JSON array.
///
/// `candidates_json` is a JSON array of strings.
#[wasm_bindgen]
pub fn filter_candidates(query: &str, candidates_json: &str) -> String {
    let Ok(candidates) = serde_json::from_str::<Vec<String>>(candidates_json) else {
        return "[]".to_string();
    };
    let matcher = crate::default_matcher();
    let matches: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| matcher.match_now(query, candidate).matched)
        .map(|(i, _)| i)
        .collect();
    serde_json::to_string(&matches).unwrap_or_else(|_| "[]".to_string())
}
