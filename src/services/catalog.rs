use std::collections::HashMap;

use crate::models::{Cuisine, Recipe};

/// Cache of profiled recipes, doubling as the feature table for training
///
/// Recipes are keyed by title. Ids are only meaningful to the provider that
/// issued them, so two providers may hand out the same id for different
/// dishes. Entries stay until explicitly invalidated.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    by_title: HashMap<String, Recipe>,
}

impl RecipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a recipe unless one with the same title is already stored
    ///
    /// Returns `true` when the recipe was new.
    pub fn insert_if_absent(&mut self, recipe: Recipe) -> bool {
        if self.by_title.contains_key(&recipe.title) {
            return false;
        }
        self.by_title.insert(recipe.title.clone(), recipe);
        true
    }

    pub fn contains(&self, title: &str) -> bool {
        self.by_title.contains_key(title)
    }

    pub fn get_by_title(&self, title: &str) -> Option<&Recipe> {
        self.by_title.get(title)
    }

    /// Feature row for a rating: the stored recipe with this title and cuisine
    pub fn feature_row(&self, title: &str, cuisine: Cuisine) -> Option<&Recipe> {
        self.get_by_title(title)
            .filter(|recipe| recipe.cuisine == cuisine)
    }

    /// Drops a cached recipe so the next lookup profiles it again
    pub fn invalidate(&mut self, title: &str) -> Option<Recipe> {
        self.by_title.remove(title)
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}
