//! Free-text filtering over recipes and candidate lists.

use crate::matcher::{CharClassMatcher, SearchMatcher};
use kondate_core::model::{IngredientCatalog, Recipe};

/// Recipes whose name, or the name of any of their ingredients, matches
/// `query`. Input order is kept.
pub async fn filter_recipes<'a>(
    matcher: &SearchMatcher,
    query: &str,
    recipes: &'a [Recipe],
    catalog: &IngredientCatalog,
) -> Vec<&'a Recipe> {
    let mut matched = Vec::new();
    for recipe in recipes {
        if recipe_matches(matcher, query, recipe, catalog).await {
            matched.push(recipe);
        }
    }
    matched
}

async fn recipe_matches(
    matcher: &SearchMatcher,
    query: &str,
    recipe: &Recipe,
    catalog: &IngredientCatalog,
) -> bool {
    if matcher.matches(query, &recipe.name).await {
        return true;
    }
    for line in &recipe.ingredients {
        if let Some(name) = catalog.name_of(line.ingredient_id) {
            if matcher.matches(query, name).await {
                return true;
            }
        }
    }
    false
}

/// Indices of `candidates` that match `query` by character folding alone.
///
/// Runs in parallel with the `parallel` feature; indices come back in
/// ascending order either way.
pub fn filter_candidates_sync<S>(query: &str, candidates: &[S]) -> Vec<usize>
where
    S: AsRef<str> + Sync,
{
    let matcher = CharClassMatcher;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        candidates
            .par_iter()
            .enumerate()
            .filter(|(_, candidate)| matcher.matches(query, candidate.as_ref()))
            .map(|(i, _)| i)
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| matcher.matches(query, candidate.as_ref()))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::ScriptDictionary;
    use kondate_core::model::{Ingredient, RecipeIngredientRef, Unit};
    use std::sync::Arc;

    fn catalog() -> IngredientCatalog {
        IngredientCatalog::new([
            Ingredient {
                id: 1,
                name: "玉ねぎ".into(),
                genre_id: Some(1),
                unit: Unit::new("個"),
            },
            Ingredient {
                id: 2,
                name: "豚肉".into(),
                genre_id: Some(2),
                unit: Unit::new("g").with_step(50.0),
            },
        ])
        .unwrap()
    }

    fn with_ingredients(id: i64, name: &str, ingredient_ids: &[i64]) -> Recipe {
        let mut recipe = Recipe::new(id, name);
        recipe.ingredients = ingredient_ids
            .iter()
            .map(|&ingredient_id| RecipeIngredientRef {
                ingredient_id,
                quantity: 1.0,
                unit: Unit::new("個"),
            })
            .collect();
        recipe
    }

    #[tokio::test]
    async fn test_matches_recipe_or_ingredient_names() {
        let matcher = SearchMatcher::from_dictionary(Arc::new(ScriptDictionary::builtin()));
        let recipes = vec![
            with_ingredients(1, "生姜焼き", &[2, 1]),
            with_ingredients(2, "オニオンスープ", &[1]),
            with_ingredients(3, "冷奴", &[]),
            with_ingredients(4, "肉じゃが", &[2, 99]),
        ];
        let catalog = catalog();

        let found = filter_recipes(&matcher, "たまねぎ", &recipes, &catalog).await;
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);

        let found = filter_recipes(&matcher, "ぶたにく", &recipes, &catalog).await;
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 4]);

        let found = filter_recipes(&matcher, "ヒヤヤッコ", &recipes, &catalog).await;
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3]);

        let found = filter_recipes(&matcher, "", &recipes, &catalog).await;
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn test_filter_candidates_sync_keeps_order() {
        let candidates = ["たまねぎ", "にんじん", "新タマネギ", "Onion", "ﾀﾏﾈｷﾞ"];
        assert_eq!(filter_candidates_sync("タマネギ", &candidates), vec![0, 2, 4]);
        assert_eq!(filter_candidates_sync("onion", &candidates), vec![3]);
        assert_eq!(filter_candidates_sync("", &candidates), vec![0, 1, 2, 3, 4]);
    }
}
