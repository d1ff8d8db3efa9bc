//! Turns the loosely typed service response into canonical [`Recipe`] records.
//!
//! Every field of every entry is optional on the wire. Each one is read through
//! a coercion helper with a fixed fallback, so the renderer only ever sees fully
//! populated records. Entries are coerced independently: an entry that cannot
//! be read at all is dropped and the rest of the batch survives.

use crate::model::{Difficulty, Nutrition, Recipe, RecipeBatch};
use crate::AnalyzerError;
use log::{debug, warn};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const UNNAMED_RECIPE: &str = "Unnamed Recipe";
pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_SERVINGS: u32 = 4;

static NEXT_BATCH: AtomicU64 = AtomicU64::new(0);

pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Normalize a whole response.
    ///
    /// Fails with [`AnalyzerError::Schema`] when `recipes` is missing or is not a list.
    pub fn normalize(&self, raw: &Value) -> Result<RecipeBatch, AnalyzerError> {
        let entries = match raw.get("recipes") {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(AnalyzerError::Schema(format!(
                    "`recipes` is {} instead of a list",
                    kind_of(other)
                )));
            }
            None => {
                return Err(AnalyzerError::Schema("response has no `recipes` field".to_string()));
            }
        };

        let batch_prefix = next_batch_prefix();
        let recipes: Vec<Recipe> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let id = format!("{}-{}", batch_prefix, index);
                match normalize_recipe(entry, id) {
                    Ok(recipe) => Some(recipe),
                    Err(e) => {
                        warn!("Dropping recipe entry {}: {}", index, e);
                        None
                    }
                }
            })
            .collect();

        debug!(
            "Normalized {} of {} recipe entries",
            recipes.len(),
            entries.len()
        );

        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(String::from);

        Ok(RecipeBatch { recipes, message })
    }
}

/// `recipe-<millis>-<batch>`: the counter keeps batches apart within one millisecond
fn next_batch_prefix() -> String {
    let batch = NEXT_BATCH.fetch_add(1, Ordering::Relaxed);
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("recipe-{}-{}", millis, batch)
}

/// Coerce one raw entry. Only a non-object entry is an error.
pub fn normalize_recipe(entry: &Value, id: String) -> Result<Recipe, AnalyzerError> {
    let fields = entry.as_object().ok_or_else(|| {
        AnalyzerError::Schema(format!(
            "recipe entry is {} instead of an object",
            kind_of(entry)
        ))
    })?;

    Ok(Recipe {
        id,
        name: text_or(fields.get("name"), UNNAMED_RECIPE),
        cooking_time: text_or(fields.get("cookingTime"), UNKNOWN),
        difficulty: Difficulty::from_label(&text_or(fields.get("difficulty"), UNKNOWN)),
        servings: servings(fields.get("servings")),
        ingredients: text_list(fields.get("ingredients")),
        instructions: text_list(fields.get("instructions")),
        nutrition: nutrition(fields.get("nutrition")),
    })
}

/// JSON values the service uses for "nothing here": null, false, 0, ""
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display text for any JSON value
fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<String>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn text_or(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(value) if is_truthy(value) => display_text(value),
        _ => fallback.to_string(),
    }
}

/// Whole servings, at least one; numeric strings such as `"6"` are accepted
fn servings(value: Option<&Value>) -> u32 {
    let count = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match count {
        Some(count) if count.is_finite() && count >= 1.0 => count.min(u32::MAX as f64) as u32,
        _ => DEFAULT_SERVINGS,
    }
}

fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(display_text)
            .collect(),
        _ => Vec::new(),
    }
}

fn nutrition(value: Option<&Value>) -> Nutrition {
    match value {
        Some(Value::Object(entries)) => nutrition_entries(entries),
        _ => Nutrition::new(),
    }
}

fn nutrition_entries(entries: &Map<String, Value>) -> Nutrition {
    entries
        .iter()
        .map(|(nutrient, value)| {
            // falsy values are kept as empty text, which the grid skips
            let text = if is_truthy(value) {
                display_text(value)
            } else {
                String::new()
            };
            (nutrient.clone(), text)
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
