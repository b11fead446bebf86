//! Output records returned to the HTTP client.

use serde::{Deserialize, Serialize};

/// One recognized food with estimated macros (grams) and calories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub kcal: u32,
}

/// Aggregate over all items of a result; always recomputed locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub kcal: u32,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// Final per-request result: items, derived totals and free-form notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub items: Vec<FoodItem>,
    pub totals: NutritionTotals,
    pub notes: String,
}
