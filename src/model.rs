use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A user supplied food item name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Ingredient { name: name.into() }
    }
}

/// How hard a recipe is to cook.
///
/// The service is free to answer with any label, so anything outside the
/// well-known levels is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unknown,
    Other(String),
}

impl Difficulty {
    /// Map a literal label to a difficulty. Matching is exact, `"easy"` is an `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Easy" => Difficulty::Easy,
            "Medium" => Difficulty::Medium,
            "Hard" => Difficulty::Hard,
            "Unknown" | "" => Difficulty::Unknown,
            other => Difficulty::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Unknown => "Unknown",
            Difficulty::Other(label) => label,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Nutrients that get a cell in the nutrition grid, with their display labels
pub const RECOGNIZED_NUTRIENTS: [(&str, &str); 5] = [
    ("calories", "Calories"),
    ("protein", "Protein"),
    ("carbs", "Carbs"),
    ("fat", "Fat"),
    ("fiber", "Fiber"),
];

/// Nutrient name to display value.
///
/// Keys outside [`RECOGNIZED_NUTRIENTS`] are kept but never rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Nutrition(BTreeMap<String, String>);

impl Nutrition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, nutrient: impl Into<String>, value: impl Into<String>) {
        self.0.insert(nutrient.into(), value.into());
    }

    pub fn get(&self, nutrient: &str) -> Option<&str> {
        self.0.get(nutrient).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recognized nutrients that carry a non-empty value, in grid order
    pub fn recognized(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        RECOGNIZED_NUTRIENTS
            .into_iter()
            .filter_map(move |(key, label)| match self.get(key) {
                Some(value) if !value.is_empty() => Some((label, value)),
                _ => None,
            })
    }
}

impl FromIterator<(String, String)> for Nutrition {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Nutrition(iter.into_iter().collect())
    }
}

/// A fully defaulted recipe, safe to hand to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique within the batch it arrived in, never shown to the user
    pub id: String,
    pub name: String,
    pub cooking_time: String,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub nutrition: Nutrition,
}

/// Result of normalizing one service response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeBatch {
    pub recipes: Vec<Recipe>,
    /// Summary sentence the service sends along with its recipes
    pub message: Option<String>,
}

/// Body of the analyze request
#[derive(Debug, Clone, Serialize)]
pub struct RecipeRequest {
    pub ingredients: Vec<Ingredient>,
    pub dietary_restrictions: Vec<String>,
    pub cuisine_preference: Option<String>,
}

impl RecipeRequest {
    pub fn new(ingredients: &[Ingredient]) -> Self {
        RecipeRequest {
            ingredients: ingredients.to_vec(),
            dietary_restrictions: Vec::new(),
            cuisine_preference: None,
        }
    }
}

/// Answer of the service health check
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub ai_enabled: bool,
}

/// Request lifecycle as seen by the view.
///
/// `in_flight` and a recorded error never hold at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    in_flight: bool,
    last_error: Option<String>,
}

impl QueryState {
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enter the in-flight state, dropping any previous error
    pub fn begin(&mut self) {
        self.last_error = None;
        self.in_flight = true;
    }

    /// Leave the in-flight state, recording the failure if there was one
    pub fn finish(&mut self, error: Option<String>) {
        self.in_flight = false;
        self.last_error = error;
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}
