//! Recipe ordering by a selected sort key.
//!
//! Every ordering is a stable sort over borrowed recipes: ties keep their
//! input order and the input slice is never touched.

use crate::error::SearchError;
use crate::scorer::Selection;
use kondate_core::model::{Recipe, SelectedIngredient};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Closed set of sort keys offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Cheapest first
    CostAsc,
    /// Best average review first; unreviewed recipes rate 0
    RatingDesc,
    /// Quickest first
    TimeAsc,
    /// Lightest first; missing calories count as 0
    CaloriesAsc,
    /// Most pantry ingredients used first
    IngredientMatchDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::CostAsc,
        SortKey::RatingDesc,
        SortKey::TimeAsc,
        SortKey::CaloriesAsc,
        SortKey::IngredientMatchDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CostAsc => "cost_asc",
            SortKey::RatingDesc => "rating_desc",
            SortKey::TimeAsc => "time_asc",
            SortKey::CaloriesAsc => "calories_asc",
            SortKey::IngredientMatchDesc => "ingredient_match_desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SearchError::UnknownSortKey(s.to_string()))
    }
}

/// Total order on sort values where -0.0 and 0.0 tie, and NaN counts as 0.
#[inline]
fn compare_values(a: f64, b: f64) -> Ordering {
    let key = |v: f64| if v.is_nan() { 0.0 } else { v + 0.0 };
    key(a).total_cmp(&key(b))
}

/// Order `recipes` by `key`.
///
/// `selected` is only consulted for [`SortKey::IngredientMatchDesc`].
pub fn rank<'a>(
    recipes: &'a [Recipe],
    key: SortKey,
    selected: &[SelectedIngredient],
) -> Vec<&'a Recipe> {
    let mut ranked: Vec<&Recipe> = recipes.iter().collect();

    match key {
        SortKey::CostAsc => {
            ranked.sort_by(|a, b| compare_values(a.cost_estimate, b.cost_estimate));
        }
        SortKey::RatingDesc => {
            let mut rated: Vec<(f64, &Recipe)> =
                ranked.into_iter().map(|r| (r.average_rating(), r)).collect();
            rated.sort_by(|a, b| compare_values(b.0, a.0));
            ranked = rated.into_iter().map(|(_, r)| r).collect();
        }
        SortKey::TimeAsc => {
            ranked.sort_by(|a, b| compare_values(a.cooking_time, b.cooking_time));
        }
        SortKey::CaloriesAsc => {
            ranked.sort_by(|a, b| {
                compare_values(a.nutrition.calories_or_zero(), b.nutrition.calories_or_zero())
            });
        }
        SortKey::IngredientMatchDesc => {
            let selection = Selection::new(selected);
            ranked.sort_by_cached_key(|r| Reverse(selection.score(r)));
        }
    }

    ranked
}

/// Order `recipes` by a sort key given by name.
///
/// An unrecognized name leaves the input order unchanged.
pub fn sort_recipes<'a>(
    recipes: &'a [Recipe],
    sort_by: &str,
    selected: &[SelectedIngredient],
) -> Vec<&'a Recipe> {
    match sort_by.parse::<SortKey>() {
        Ok(key) => rank(recipes, key, selected),
        Err(e) => {
            debug!(error = %e, "Keeping input order");
            recipes.iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kondate_core::model::{RecipeIngredientRef, Review, Unit};

    fn recipe(id: i64, cost: f64, time: f64) -> Recipe {
        let mut r = Recipe::new(id, format!("recipe {id}"));
        r.cost_estimate = cost;
        r.cooking_time = time;
        r
    }

    fn ids(ranked: &[&Recipe]) -> Vec<i64> {
        ranked.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_cost_ascending_is_stable() {
        // A{300,20}, B{300,10}, C{100,30}
        let recipes = vec![recipe(1, 300.0, 20.0), recipe(2, 300.0, 10.0), recipe(3, 100.0, 30.0)];
        assert_eq!(ids(&rank(&recipes, SortKey::CostAsc, &[])), vec![3, 1, 2]);
    }

    #[test]
    fn test_time_ascending() {
        let recipes = vec![recipe(1, 300.0, 20.0), recipe(2, 300.0, 10.0), recipe(3, 100.0, 30.0)];
        assert_eq!(ids(&rank(&recipes, SortKey::TimeAsc, &[])), vec![2, 1, 3]);
    }

    #[test]
    fn test_rating_descending_with_unreviewed() {
        let mut unreviewed = recipe(1, 0.0, 0.0);
        unreviewed.reviews.clear();
        let mut low = recipe(2, 0.0, 0.0);
        low.reviews = vec![Review { rating: 1.0 }];
        let mut high = recipe(3, 0.0, 0.0);
        high.reviews = vec![Review { rating: 5.0 }, Review { rating: 4.0 }];

        let recipes = vec![unreviewed, low, high];
        assert_eq!(ids(&rank(&recipes, SortKey::RatingDesc, &[])), vec![3, 2, 1]);
    }

    #[test]
    fn test_rating_ties_keep_order() {
        let mut a = recipe(1, 0.0, 0.0);
        a.reviews = vec![Review { rating: 4.0 }];
        let mut b = recipe(2, 0.0, 0.0);
        b.reviews = vec![Review { rating: 3.0 }, Review { rating: 5.0 }];
        let c = recipe(3, 0.0, 0.0);
        let d = recipe(4, 0.0, 0.0);

        let recipes = vec![c, a, d, b];
        assert_eq!(ids(&rank(&recipes, SortKey::RatingDesc, &[])), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_calories_missing_counts_as_zero() {
        let mut heavy = recipe(1, 0.0, 0.0);
        heavy.nutrition.calories = Some(800.0);
        let unknown = recipe(2, 0.0, 0.0);
        let mut light = recipe(3, 0.0, 0.0);
        light.nutrition.calories = Some(120.0);

        let recipes = vec![heavy, unknown, light];
        assert_eq!(ids(&rank(&recipes, SortKey::CaloriesAsc, &[])), vec![2, 3, 1]);
    }

    #[test]
    fn test_signed_zero_ties_keep_order() {
        let recipes = vec![recipe(1, 0.0, -0.0), recipe(2, -0.0, 0.0), recipe(3, 0.0, -0.0)];
        assert_eq!(ids(&rank(&recipes, SortKey::CostAsc, &[])), vec![1, 2, 3]);
        assert_eq!(ids(&rank(&recipes, SortKey::TimeAsc, &[])), vec![1, 2, 3]);
    }

    #[test]
    fn test_null_fields_sort_as_zero() {
        let data = kondate_core::model::RecipeData::from_json(
            r#"{"recipes": [
                {"id": 1, "name": "カレー", "cost_estimate": 600, "cooking_time": 45,
                 "nutrition": {"calories": 700}, "reviews": [{"rating": 3}]},
                {"id": 2, "name": "冷奴", "cost_estimate": null, "cooking_time": null,
                 "nutrition": null, "reviews": null},
                {"id": 3, "name": "味噌汁", "cost_estimate": 0, "cooking_time": 0,
                 "nutrition": {"calories": 0}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(ids(&rank(&data.recipes, SortKey::CostAsc, &[])), vec![2, 3, 1]);
        assert_eq!(ids(&rank(&data.recipes, SortKey::TimeAsc, &[])), vec![2, 3, 1]);
        assert_eq!(ids(&rank(&data.recipes, SortKey::CaloriesAsc, &[])), vec![2, 3, 1]);
        assert_eq!(ids(&rank(&data.recipes, SortKey::RatingDesc, &[])), vec![1, 2, 3]);
    }

    #[test]
    fn test_ingredient_match_descending() {
        let line = |id: i64, unit: &str| RecipeIngredientRef {
            ingredient_id: id,
            quantity: 1.0,
            unit: Unit::new(unit),
        };
        let mut none = recipe(1, 0.0, 0.0);
        none.ingredients = vec![line(9, "g")];
        let mut one = recipe(2, 0.0, 0.0);
        one.ingredients = vec![line(1, "g"), line(2, "tablespoon")];
        let mut two = recipe(3, 0.0, 0.0);
        two.ingredients = vec![line(1, "g"), line(3, "個")];
        let mut also_one = recipe(4, 0.0, 0.0);
        also_one.ingredients = vec![line(3, "本")];

        let selected = [
            SelectedIngredient::new(1, 1.0),
            SelectedIngredient::new(2, 1.0),
            SelectedIngredient::new(3, 1.0),
        ];
        let recipes = vec![none, one, two, also_one];
        assert_eq!(
            ids(&rank(&recipes, SortKey::IngredientMatchDesc, &selected)),
            vec![3, 2, 4, 1]
        );
    }

    #[test]
    fn test_input_untouched_and_repeatable() {
        let recipes = vec![recipe(1, 500.0, 0.0), recipe(2, 100.0, 0.0), recipe(3, 100.0, 0.0)];
        let before = recipes.clone();

        let first = ids(&rank(&recipes, SortKey::CostAsc, &[]));
        let second = ids(&rank(&recipes, SortKey::CostAsc, &[]));
        assert_eq!(first, second);
        assert_eq!(recipes, before);
    }

    #[test]
    fn test_unknown_key_keeps_order() {
        let recipes = vec![recipe(1, 300.0, 0.0), recipe(2, 100.0, 0.0)];
        assert_eq!(ids(&sort_recipes(&recipes, "popularity", &[])), vec![1, 2]);
        assert_eq!(ids(&sort_recipes(&recipes, "cost_asc", &[])), vec![2, 1]);
    }

    #[test]
    fn test_sort_key_round_trip_names() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert!(matches!(
            "COST_ASC".parse::<SortKey>(),
            Err(SearchError::UnknownSortKey(_))
        ));
        assert_eq!(serde_json::to_string(&SortKey::RatingDesc).unwrap(), "\"rating_desc\"");
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], SortKey::CostAsc, &[]).is_empty());
    }
}
