use recipex_core::{Error, RecipeRecord, Result, NUMERIC_FIELDS, NUMERIC_FIELD_COUNT};
use serde::{Deserialize, Serialize};

/// What a user asks for: target time and nutrition plus ingredients on hand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeQuery {
    pub prep_time: f64,
    pub calories: f64,
    pub fat: f64,
    pub carbohydrates: f64,
    pub protein: f64,
    pub cholesterol: f64,
    pub sodium: f64,
    pub fiber: f64,
    pub ingredients: String,
}

impl RecipeQuery {
    #[must_use]
    pub fn new(ingredients: impl Into<String>) -> Self {
        Self {
            ingredients: ingredients.into(),
            ..Self::default()
        }
    }

    /// Build from the eight numeric fields in feature order
    #[must_use]
    pub fn from_features(numeric: [f64; NUMERIC_FIELD_COUNT], ingredients: impl Into<String>) -> Self {
        let [prep_time, calories, fat, carbohydrates, protein, cholesterol, sodium, fiber] = numeric;
        Self {
            prep_time,
            calories,
            fat,
            carbohydrates,
            protein,
            cholesterol,
            sodium,
            fiber,
            ingredients: ingredients.into(),
        }
    }

    /// A query asking for something just like an existing recipe
    #[must_use]
    pub fn like(record: &RecipeRecord) -> Self {
        Self::from_features(record.numeric_features(), record.ingredients.clone())
    }

    #[must_use]
    pub fn with_prep_time(mut self, minutes: f64) -> Self {
        self.prep_time = minutes;
        self
    }

    #[must_use]
    pub fn with_calories(mut self, calories: f64) -> Self {
        self.calories = calories;
        self
    }

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

    pub fn validate(&self) -> Result<()> {
        for (field, value) in NUMERIC_FIELDS.iter().zip(self.numeric_features()) {
            if !value.is_finite() || value.abs() > f64::from(f32::MAX) {
                return Err(Error::InvalidInput(format!(
                    "query field '{}' must be a finite number within f32 range, got {}",
                    field, value
                )));
            }
        }
        Ok(())
    }
}
