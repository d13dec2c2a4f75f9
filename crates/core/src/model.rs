//! Domain model shared by the search engine and its callers
//!
//! Recipes and ingredients are owned by the data layer. The engine only
//! borrows them, so everything here is plain data with serde support and
//! lenient defaults for missing numeric fields. A field that is null or not
//! a number reads as zero (or empty) rather than failing the whole record.

use crate::error::{Error, Result, ResultExt};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Unit labels that mark an ingredient as seasoning. Recognized by exact
/// name, in English or as the Japanese label used by the catalog.
pub const SEASONING_UNITS: &[&str] = &[
    "tablespoon",
    "teaspoon",
    "to taste",
    "a pinch",
    "a dash",
    "大さじ",
    "小さじ",
    "適量",
    "ひとつまみ",
    "少々",
];

/// Any JSON value where a number is expected. Numeric strings are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LenientNumber {
    fn value(self) -> Option<f64> {
        let value = match self {
            LenientNumber::Number(n) => n,
            LenientNumber::Text(text) => text.trim().parse().ok()?,
            LenientNumber::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

fn number_or_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?.value().unwrap_or(0.0))
}

fn optional_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LenientNumber::deserialize(deserializer)?.value())
}

/// `null` reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Classification of a unit of measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Counted or weighed amounts (grams, pieces, ml, ...)
    Measured,
    /// Spoonfuls and "to taste" amounts; ignored by ingredient matching
    Seasoning,
}

impl UnitKind {
    /// Classify a unit by its name.
    pub fn classify(unit_name: &str) -> Self {
        if SEASONING_UNITS.contains(&unit_name) {
            Self::Seasoning
        } else {
            Self::Measured
        }
    }
}

/// A unit of measure with its input step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Display name, also used for classification
    pub name: String,
    /// Increment used by quantity pickers
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_step() -> f64 {
    1.0
}

impl Unit {
    /// Create a unit with the default step of 1.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            step: default_step(),
        }
    }

    /// Set the picker step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Measured or seasoning, derived from the name.
    pub fn kind(&self) -> UnitKind {
        UnitKind::classify(&self.name)
    }

    pub fn is_seasoning(&self) -> bool {
        self.kind() == UnitKind::Seasoning
    }
}

/// A pantry ingredient from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub genre_id: Option<i64>,
    pub unit: Unit,
}

/// An ingredient the user picked in the pantry, with the amount on hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedIngredient {
    pub ingredient_id: i64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub quantity: f64,
}

impl SelectedIngredient {
    pub fn new(ingredient_id: i64, quantity: f64) -> Self {
        Self {
            ingredient_id,
            quantity,
        }
    }
}

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientRef {
    pub ingredient_id: i64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub quantity: f64,
    pub unit: Unit,
}

/// Nutrition facts per serving. Absent values count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, deserialize_with = "optional_number")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub fat: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub carbohydrates: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub salt: Option<f64>,
}

impl Nutrition {
    /// Calories, zero when absent.
    pub fn calories_or_zero(&self) -> f64 {
        self.calories.unwrap_or(0.0)
    }
}

/// A single user review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub rating: f64,
}

/// A recipe as delivered by the recipe data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub genre: Option<String>,
    /// Estimated cost in yen
    #[serde(default, deserialize_with = "number_or_zero")]
    pub cost_estimate: f64,
    /// Cooking time in minutes
    #[serde(default, deserialize_with = "number_or_zero")]
    pub cooking_time: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nutrition: Nutrition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<RecipeIngredientRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Vec<Review>,
}

impl Recipe {
    /// Create a recipe with only an id and a name; everything else zero.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            genre: None,
            cost_estimate: 0.0,
            cooking_time: 0.0,
            nutrition: Nutrition::default(),
            ingredients: Vec::new(),
            reviews: Vec::new(),
        }
    }

    /// Mean review rating, 0 without reviews.
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.reviews.iter().map(|r| r.rating).sum();
        sum / self.reviews.len() as f64
    }
}

/// Ingredient catalog indexed by id.
#[derive(Debug, Clone, Default)]
pub struct IngredientCatalog {
    by_id: HashMap<i64, Ingredient>,
}

impl IngredientCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(ingredients: impl IntoIterator<Item = Ingredient>) -> Result<Self> {
        let mut by_id = HashMap::new();
        for ingredient in ingredients {
            let id = ingredient.id;
            if by_id.insert(id, ingredient).is_some() {
                return Err(Error::duplicate_id("ingredient", id));
            }
        }
        Ok(Self { by_id })
    }

    pub fn get(&self, id: i64) -> Option<&Ingredient> {
        self.by_id.get(&id)
    }

    /// Name of an ingredient, if the id is known.
    pub fn name_of(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(|i| i.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Recipe and ingredient data as exported by the data layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeData {
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl RecipeData {
    /// Parse a JSON export and check id uniqueness.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json)?;
        data.check_unique_recipe_ids()?;
        Ok(data)
    }

    /// Load a JSON export from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).context(format!("While loading {}", path.display()))
    }

    /// Build the ingredient catalog for name lookups.
    pub fn catalog(&self) -> Result<IngredientCatalog> {
        IngredientCatalog::new(self.ingredients.iter().cloned())
    }

    fn check_unique_recipe_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for recipe in &self.recipes {
            if !seen.insert(recipe.id) {
                return Err(Error::duplicate_id("recipe", recipe.id));
            }
        }
        Ok(())
    }
}
