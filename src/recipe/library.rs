//! In-memory recipe library

use tracing::info;

use super::{builtin::chicken_curry, Recipe, RecipeProvider};
use crate::error::RecipeError;

#[derive(Debug, Clone, Default)]
pub struct RecipeLibrary {
    recipes: Vec<Recipe>,
}

impl RecipeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library seeded with the built-in recipes
    pub fn with_builtin() -> Self {
        Self {
            recipes: vec![chicken_curry()],
        }
    }

    /// Add a recipe, replacing any existing one with the same id
    pub fn import(&mut self, recipe: Recipe) -> Result<(), RecipeError> {
        recipe.validate()?;
        match self.recipes.iter_mut().find(|r| r.id == recipe.id) {
            Some(existing) => {
                info!("Replacing recipe '{}'", recipe.id);
                *existing = recipe;
            }
            None => {
                info!("Imported recipe '{}' ({} steps)", recipe.id, recipe.steps.len());
                self.recipes.push(recipe);
            }
        }
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<Recipe, RecipeError> {
        let position = self
            .recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RecipeError::NotFound(id.to_string()))?;
        info!("Deleted recipe '{}'", id);
        Ok(self.recipes.remove(position))
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn list(&self) -> &[Recipe] {
        &self.recipes
    }
}

impl RecipeProvider for RecipeLibrary {
    fn recipe(&self, id: &str) -> Option<Recipe> {
        self.get(id).cloned()
    }

    fn recipes(&self) -> Vec<Recipe> {
        self.recipes.clone()
    }
}
