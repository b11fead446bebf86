//! Turn an untrusted model reply into a [`NormalizedResult`].
//!
//! Once a JSON object is recovered this never fails: every malformed field is
//! defaulted independently and totals are always recomputed from the items,
//! ignoring any `totals` the model may have sent.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    errors::{AnalyzeError, AnalyzeResult},
    extract::extract_json_object,
    model::{FoodItem, NormalizedResult, NutritionTotals},
};

/// Name used when an item has no usable `name`.
pub const DEFAULT_ITEM_NAME: &str = "Unknown food";

/// kcal per gram of protein, carbohydrate and fat.
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Parses the raw reply and normalizes it.
///
/// # Errors
/// [`AnalyzeError::UnparseableResponse`] (carrying the raw reply) when no JSON
/// object can be recovered.
pub fn normalize_reply(raw: &str) -> AnalyzeResult<NormalizedResult> {
    let Some(obj) = extract_json_object(raw) else {
        warn!(reply_chars = raw.chars().count(), "model reply contains no JSON object");
        return Err(AnalyzeError::UnparseableResponse {
            raw: raw.to_string(),
        });
    };

    let result = normalize_object(&obj);
    debug!(
        items = result.items.len(),
        kcal = result.totals.kcal,
        "model reply normalized"
    );
    Ok(result)
}

/// Normalizes an already-parsed object.
pub fn normalize_object(obj: &Map<String, Value>) -> NormalizedResult {
    let items: Vec<FoodItem> = match obj.get("items") {
        Some(Value::Array(raw_items)) => raw_items.iter().map(normalize_item).collect(),
        _ => Vec::new(),
    };

    let notes = match obj.get("notes") {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    NormalizedResult {
        totals: compute_totals(&items),
        items,
        notes,
    }
}

/// Builds one item; non-object inputs yield a fully defaulted item.
pub fn normalize_item(raw: &Value) -> FoodItem {
    let field = |key: &str| raw.as_object().and_then(|o| o.get(key));

    let name = match field("name") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => DEFAULT_ITEM_NAME.to_string(),
    };

    let protein = macro_grams(field("protein"));
    let fat = macro_grams(field("fat"));
    let carbs = macro_grams(field("carbs"));

    let kcal = match coerce_number(field("kcal")) {
        Some(k) => to_kcal(k),
        None => derive_kcal(protein, carbs, fat),
    };

    FoodItem {
        name,
        protein,
        fat,
        carbs,
        kcal,
    }
}

/// Element-wise sum over `items`, macros rounded to one decimal after summation.
pub fn compute_totals(items: &[FoodItem]) -> NutritionTotals {
    let (kcal, protein, fat, carbs) = items.iter().fold(
        (0u32, 0.0f64, 0.0f64, 0.0f64),
        |(k, p, f, c), it| {
            (
                k.saturating_add(it.kcal),
                p + it.protein,
                f + it.fat,
                c + it.carbs,
            )
        },
    );

    NutritionTotals {
        kcal,
        protein: round1(protein),
        fat: round1(fat),
        carbs: round1(carbs),
    }
}

/// `round(protein*4 + carbs*4 + fat*9)`.
pub fn derive_kcal(protein: f64, carbs: f64, fat: f64) -> u32 {
    to_kcal(protein * KCAL_PER_G_PROTEIN + carbs * KCAL_PER_G_CARBS + fat * KCAL_PER_G_FAT)
}

/// Number from a JSON number or numeric string; `None` when absent or not finite.
fn coerce_number(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Non-negative grams rounded to one decimal; anything unusable becomes 0.
fn macro_grams(v: Option<&Value>) -> f64 {
    round1(non_negative(coerce_number(v).unwrap_or(0.0)))
}

fn to_kcal(x: f64) -> u32 {
    // Float-to-int `as` saturates, so absurd values clamp to u32::MAX.
    non_negative(x).round() as u32
}

/// Clamps to `>= 0`, also mapping `-0.0` to `0.0`.
fn non_negative(x: f64) -> f64 {
    if x > 0.0 { x } else { 0.0 }
}

fn round1(x: f64) -> f64 {
    let r = (x * 10.0).round() / 10.0;
    if r == 0.0 { 0.0 } else { r }
}
