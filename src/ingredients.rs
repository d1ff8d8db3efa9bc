use crate::model::Ingredient;
use log::debug;

/// Ordered ingredient collection, unique under case-insensitive comparison
#[derive(Debug, Clone, Default)]
pub struct IngredientStore {
    items: Vec<Ingredient>,
}

impl IngredientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `raw` after trimming it.
    ///
    /// Returns `false` without touching the collection when the trimmed text
    /// is empty or already present.
    pub fn add(&mut self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return false;
        }
        if self.contains(trimmed) {
            debug!("Ignoring duplicate ingredient '{}'", trimmed);
            return false;
        }

        self.items.push(Ingredient::new(trimmed));
        true
    }

    /// Remove the ingredient at `index`; out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<Ingredient> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            debug!(
                "Ignoring removal at {} (only {} ingredients)",
                index,
                self.items.len()
            );
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.items
            .iter()
            .any(|ingredient| ingredient.name.to_lowercase() == needle)
    }

    pub fn as_slice(&self) -> &[Ingredient] {
        &self.items
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|ingredient| ingredient.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
