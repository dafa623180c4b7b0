//! Recipes: the source of step sequences
//!
//! Only the shapes the cooking core consumes are checked here: a recipe needs
//! at least one step and its step ids must be unique.

pub mod builtin;
pub mod library;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{error::RecipeError, state::Step};

pub use builtin::chicken_curry;
pub use library::RecipeLibrary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub id: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    /// Seconds; absent or zero means no timer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.steps.is_empty() {
            return Err(RecipeError::Empty(self.id.clone()));
        }
        let mut seen = HashSet::with_capacity(self.steps.len());
        for step in &self.steps {
            if !seen.insert(step.id) {
                return Err(RecipeError::DuplicateStep {
                    recipe: self.id.clone(),
                    step_id: step.id,
                });
            }
        }
        Ok(())
    }

    /// Fresh, all-incomplete steps in recipe order
    pub fn to_steps(&self) -> Vec<Step> {
        self.steps
            .iter()
            .map(|s| Step::new(s.id, s.description.clone()).with_timer(s.timer_duration.unwrap_or(0)))
            .collect()
    }
}

/// Supplies recipes to seed the step sequence when one is selected
pub trait RecipeProvider: Send + Sync {
    fn recipe(&self, id: &str) -> Option<Recipe>;

    fn recipes(&self) -> Vec<Recipe>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: u32, timer: Option<u32>) -> RecipeStep {
        RecipeStep {
            id,
            description: format!("step {id}"),
            emoji: None,
            timer_duration: timer,
        }
    }

    fn recipe(steps: Vec<RecipeStep>) -> Recipe {
        Recipe {
            id: "r".into(),
            name: "R".into(),
            emoji: String::new(),
            description: String::new(),
            steps,
        }
    }

    #[test]
    fn rejects_empty_and_duplicate_steps() {
        assert_eq!(recipe(vec![]).validate(), Err(RecipeError::Empty("r".into())));
        assert_eq!(
            recipe(vec![step(1, None), step(1, None)]).validate(),
            Err(RecipeError::DuplicateStep { recipe: "r".into(), step_id: 1 })
        );
        assert!(recipe(vec![step(2, None), step(1, Some(30))]).validate().is_ok());
    }

    #[test]
    fn zero_timer_becomes_untimed_step() {
        let steps = recipe(vec![step(1, Some(0)), step(2, Some(45)), step(3, None)]).to_steps();
        let timers: Vec<_> = steps.iter().map(|s| s.timer_duration_seconds).collect();
        assert_eq!(timers, [None, Some(45), None]);
        assert!(steps.iter().all(|s| !s.completed));
    }

    #[test]
    fn parses_import_json() {
        let json = r#"{
            "id": "my-pasta-001",
            "name": "Creamy Pasta",
            "emoji": "🍝",
            "steps": [
                { "id": 1, "description": "Boil water." },
                { "id": 2, "description": "Cook pasta.", "timer_duration": 600 }
            ]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.steps[1].timer_duration, Some(600));
        assert!(recipe.description.is_empty());
    }
}
