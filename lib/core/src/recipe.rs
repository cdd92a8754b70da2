use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Number of numeric columns every record and query carries
pub const NUMERIC_FIELD_COUNT: usize = 8;

/// Column names of the numeric features, in feature order
pub const NUMERIC_FIELDS: [&str; NUMERIC_FIELD_COUNT] = [
    "prep_time",
    "calories",
    "fat",
    "carbohydrates",
    "protein",
    "cholesterol",
    "sodium",
    "fiber",
];

/// Position of a record in the corpus it was loaded from
pub type RecipeId = usize;

/// One row of the recipe corpus.
///
/// Field names on the wire follow the corpus column names, so a JSON export of
/// the dataset deserializes directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeRecord {
    #[serde(rename = "recipe_name")]
    pub name: String,
    /// Minutes
    pub prep_time: f64,
    pub calories: f64,
    pub fat: f64,
    pub carbohydrates: f64,
    pub protein: f64,
    pub cholesterol: f64,
    pub sodium: f64,
    pub fiber: f64,
    #[serde(rename = "ingredients_list")]
    pub ingredients: String,
    #[serde(rename = "formatted_directions", default)]
    pub directions: String,
}

impl RecipeRecord {
    /// Create a record with every numeric field zeroed
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prep_time: 0.0,
            calories: 0.0,
            fat: 0.0,
            carbohydrates: 0.0,
            protein: 0.0,
            cholesterol: 0.0,
            sodium: 0.0,
            fiber: 0.0,
            ingredients: ingredients.into(),
            directions: String::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_prep_time(mut self, minutes: f64) -> Self {
        self.prep_time = minutes;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_calories(mut self, calories: f64) -> Self {
        self.calories = calories;
        self
    }

    /// Set every nutrition column at once, in feature order after prep time
    #[inline]
    #[must_use]
    pub fn with_nutrition(mut self, nutrition: [f64; NUMERIC_FIELD_COUNT - 1]) -> Self {
        let [calories, fat, carbohydrates, protein, cholesterol, sodium, fiber] = nutrition;
        self.calories = calories;
        self.fat = fat;
        self.carbohydrates = carbohydrates;
        self.protein = protein;
        self.cholesterol = cholesterol;
        self.sodium = sodium;
        self.fiber = fiber;
        self
    }

    /// Numeric features in [`NUMERIC_FIELDS`] order
    #[inline]
    #[must_use]
    pub fn numeric_features(&self) -> [f64; NUMERIC_FIELD_COUNT] {
        [
            self.prep_time,
            self.calories,
            self.fat,
            self.carbohydrates,
            self.protein,
            self.cholesterol,
            self.sodium,
            self.fiber,
        ]
    }

    /// Reject non-finite or negative numeric columns
    pub fn validate(&self) -> Result<()> {
        for (field, value) in NUMERIC_FIELDS.iter().zip(self.numeric_features()) {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "recipe '{}': field '{}' must be a finite non-negative number, got {}",
                    self.name, field, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_feature_order() {
        let record = RecipeRecord::new("Omelette", "egg milk")
            .with_prep_time(10.0)
            .with_nutrition([100.0, 7.0, 1.0, 6.0, 180.0, 70.0, 0.5]);
        assert_eq!(
            record.numeric_features(),
            [10.0, 100.0, 7.0, 1.0, 6.0, 180.0, 70.0, 0.5]
        );
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let ok = RecipeRecord::new("a", "x").with_calories(12.0);
        assert!(ok.validate().is_ok());

        let negative = RecipeRecord::new("b", "x").with_calories(-1.0);
        assert!(matches!(negative.validate(), Err(Error::InvalidInput(_))));

        let nan = RecipeRecord::new("c", "x").with_prep_time(f64::NAN);
        assert!(matches!(nan.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_deserialize_corpus_columns() {
        let json = r#"{
            "recipe_name": "Tomato Soup",
            "prep_time": 25,
            "calories": 180,
            "fat": 4,
            "carbohydrates": 30,
            "protein": 5,
            "cholesterol": 0,
            "sodium": 600,
            "fiber": 6,
            "ingredients_list": "tomato, onion, garlic",
            "formatted_directions": "Simmer."
        }"#;
        let record: RecipeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Tomato Soup");
        assert_eq!(record.sodium, 600.0);
        assert_eq!(record.ingredients, "tomato, onion, garlic");
        assert_eq!(record.directions, "Simmer.");
    }
}
