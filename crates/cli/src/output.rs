//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use kondate_core::model::Recipe;
use owo_colors::OwoColorize;
use std::fmt;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Format a cost in yen with thousands separators, rounded to whole yen
pub fn format_yen(cost: f64) -> String {
    let yen = cost.round().max(0.0) as u64;
    let digits = yen.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("¥{}", grouped)
}

/// Format a cooking time given in minutes
pub fn format_minutes(minutes: f64) -> String {
    let minutes = minutes.round().max(0.0) as u64;
    if minutes < 60 {
        format!("{} min", minutes)
    } else if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

/// Format a recipe's average rating
pub fn format_rating(recipe: &Recipe) -> String {
    if recipe.reviews.is_empty() {
        "no reviews".to_string()
    } else {
        format!(
            "★ {:.1} ({})",
            recipe.average_rating(),
            format_count(recipe.reviews.len(), "review", "reviews")
        )
    }
}

/// One line of a ranked recipe listing
pub struct RecipeRow<'a> {
    /// 1-based position in the listing
    pub position: usize,
    /// The recipe shown
    pub recipe: &'a Recipe,
    /// Pantry ingredient matches, when a selection was given
    pub pantry_matches: Option<usize>,
}

impl RecipeRow<'_> {
    /// Right-aligned position marker, e.g. `"  1. "`
    pub fn prefix(&self) -> String {
        format!("{:>3}. ", self.position)
    }

    /// Everything after the recipe name
    pub fn details(&self) -> String {
        let recipe = self.recipe;
        let mut details = format!(
            "  {}  {}  {} kcal  {}",
            format_yen(recipe.cost_estimate),
            format_minutes(recipe.cooking_time),
            recipe.nutrition.calories_or_zero().round(),
            format_rating(recipe),
        );
        if let Some(matches) = self.pantry_matches {
            details.push_str("  ");
            details.push_str(&format_count(matches, "pantry match", "pantry matches"));
        }
        details
    }
}

impl fmt::Display for RecipeRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix(), self.recipe.name, self.details())
    }
}

/// Print a ranked listing, highlighting recipe names
pub fn print_recipes<'a>(
    recipes: impl IntoIterator<Item = &'a Recipe>,
    pantry_matches: impl Fn(&Recipe) -> Option<usize>,
) {
    for (i, recipe) in recipes.into_iter().enumerate() {
        let row = RecipeRow {
            position: i + 1,
            recipe,
            pantry_matches: pantry_matches(recipe),
        };
        println!("{}{}{}", row.prefix(), recipe.name.bold(), row.details().dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kondate_core::model::Review;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        let d = Duration::from_millis(500);
        assert_eq!(format_duration(d), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        let d = Duration::from_secs_f32(5.5);
        assert_eq!(format_duration(d), "5.5s");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "recipe", "recipes"), "1 recipe");
        assert_eq!(format_count(5, "recipe", "recipes"), "5 recipes");
    }

    #[test]
    fn test_format_yen() {
        assert_eq!(format_yen(0.0), "¥0");
        assert_eq!(format_yen(980.0), "¥980");
        assert_eq!(format_yen(1280.4), "¥1,280");
        assert_eq!(format_yen(1234567.0), "¥1,234,567");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(25.0), "25 min");
        assert_eq!(format_minutes(60.0), "1h");
        assert_eq!(format_minutes(95.0), "1h 35m");
    }

    #[test]
    fn test_recipe_row() {
        let mut recipe = Recipe::new(1, "肉じゃが");
        recipe.cost_estimate = 450.0;
        recipe.cooking_time = 40.0;
        recipe.nutrition.calories = Some(380.0);
        recipe.reviews = vec![Review { rating: 4.0 }, Review { rating: 5.0 }];

        let row = RecipeRow {
            position: 1,
            recipe: &recipe,
            pantry_matches: Some(2),
        };
        assert_eq!(
            row.to_string(),
            "  1. 肉じゃが  ¥450  40 min  380 kcal  ★ 4.5 (2 reviews)  2 pantry matches"
        );
    }

    #[test]
    fn test_recipe_row_pieces_with_numeric_name() {
        let recipe = Recipe::new(1, "1");
        let row = RecipeRow {
            position: 1,
            recipe: &recipe,
            pantry_matches: None,
        };
        assert_eq!(row.prefix(), "  1. ");
        assert_eq!(row.details(), "  ¥0  0 min  0 kcal  no reviews");
        assert_eq!(row.to_string(), "  1. 1  ¥0  0 min  0 kcal  no reviews");
    }

    #[test]
    fn test_unreviewed_rating() {
        assert_eq!(format_rating(&Recipe::new(2, "冷奴")), "no reviews");
    }
}
