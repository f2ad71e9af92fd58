use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::recipe::{IngredientAmount, NewRecipe, UpdateRecipe};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

const NAME_MAX_LEN: u64 = 200;
const IMAGE_MAX_LEN: u64 = 2048;
const COOKING_TIME_MAX: i32 = 32_000;
const AMOUNT_MAX: f64 = 1_000_000.0;

/// Result type returned by the recipe form helpers.
pub type RecipeFormResult<T> = Result<T, RecipeFormError>;

/// Errors that can occur while processing recipe forms.
#[derive(Debug, Error)]
pub enum RecipeFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("recipe name cannot be empty")]
    EmptyName,
    #[error("recipe text cannot be empty")]
    EmptyText,
    #[error("ingredient {0} is listed more than once")]
    DuplicateIngredient(i32),
    #[error("amount of ingredient {0} must be a finite non-negative number")]
    InvalidAmount(i32),
}

/// One `{id, amount}` entry of a recipe payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngredientAmountForm {
    #[validate(range(min = 1))]
    pub id: i32,
    #[validate(range(min = 0.0, max = AMOUNT_MAX))]
    pub amount: f64,
}

/// Payload used both to create a recipe and to replace one on update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = IMAGE_MAX_LEN))]
    pub image: Option<String>,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(range(min = 1, max = COOKING_TIME_MAX))]
    pub cooking_time: i32,
    #[validate(length(min = 1), nested)]
    pub ingredients: Vec<IngredientAmountForm>,
    /// Tag ids; repeated ids collapse into one.
    #[serde(default)]
    pub tags: Vec<i32>,
}

struct SanitizedRecipe {
    name: String,
    image: Option<String>,
    text: String,
    cooking_time: i32,
    ingredients: Vec<IngredientAmount>,
    tag_ids: Vec<i32>,
}

impl RecipeForm {
    /// Validates and sanitizes the payload into a domain `NewRecipe`.
    pub fn into_new_recipe(self, author_id: i32) -> RecipeFormResult<NewRecipe> {
        let recipe = self.sanitize()?;

        Ok(NewRecipe {
            author_id,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
            ingredients: recipe.ingredients,
            tag_ids: recipe.tag_ids,
        })
    }

    /// Validates and sanitizes the payload into a full-replacement `UpdateRecipe`.
    pub fn into_update_recipe(self, updated_at: NaiveDateTime) -> RecipeFormResult<UpdateRecipe> {
        let recipe = self.sanitize()?;

        Ok(UpdateRecipe {
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
            ingredients: recipe.ingredients,
            tag_ids: recipe.tag_ids,
            updated_at,
        })
    }

    fn sanitize(self) -> RecipeFormResult<SanitizedRecipe> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(RecipeFormError::EmptyName);
        }

        let text = sanitize_multiline_text(&self.text);
        if text.is_empty() {
            return Err(RecipeFormError::EmptyText);
        }

        let image = self
            .image
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty());

        let mut seen = HashSet::new();
        let mut ingredients = Vec::with_capacity(self.ingredients.len());
        for entry in self.ingredients {
            if !entry.amount.is_finite() || entry.amount < 0.0 {
                return Err(RecipeFormError::InvalidAmount(entry.id));
            }
            if !seen.insert(entry.id) {
                return Err(RecipeFormError::DuplicateIngredient(entry.id));
            }
            ingredients.push(IngredientAmount {
                ingredient_id: entry.id,
                amount: entry.amount,
            });
        }

        let mut seen_tags = HashSet::new();
        let tag_ids = self
            .tags
            .into_iter()
            .filter(|tag_id| seen_tags.insert(*tag_id))
            .collect();

        Ok(SanitizedRecipe {
            name,
            image,
            text,
            cooking_time: self.cooking_time,
            ingredients,
            tag_ids,
        })
    }
}
