//! Recipe values produced by the generation flows
//!
//! - `Recipe` / `Nutrition` mirror the structured output of the generation
//!   and nutrition-analysis flows
//! - `steps` turns free-form instructions into cooking steps
//! - `duration` finds the countdown embedded in a step

pub mod duration;
pub mod steps;
mod transform;

pub use duration::{detect_duration, format_clock};
pub use steps::extract_steps;

use serde::{Deserialize, Serialize};

/// A generated recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Display name of the dish
    #[serde(rename = "recipeName")]
    pub name: String,

    /// Ingredient lines, in the order the generator listed them
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Free-form, newline-delimited cooking instructions (optionally numbered)
    pub instructions: String,
}

impl Recipe {
    pub fn new(name: impl Into<String>, ingredients: Vec<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients,
            instructions: instructions.into(),
        }
    }

    /// Ordered cooking steps derived from the instructions
    pub fn steps(&self) -> Vec<String> {
        extract_steps(&self.instructions)
    }
}

/// Nutritional breakdown returned by the nutrition-analysis flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,

    /// Grams
    pub protein: f64,

    /// Grams
    pub fat: f64,

    /// Grams
    pub carbohydrates: f64,

    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Omitted when the analysis could not determine it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<f64>,
}
