use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Reference entry describing something a recipe can call for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Payload required to register a new ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

impl NewIngredient {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            measurement_unit: measurement_unit.into().trim().to_string(),
        }
    }
}

/// Query definition used to list ingredients.
#[derive(Debug, Clone, Default)]
pub struct IngredientListQuery {
    /// Case-insensitive prefix the ingredient name must start with.
    pub name_prefix: Option<String>,
    pub pagination: Option<Pagination>,
}

impl IngredientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only ingredients whose name starts with `prefix`.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
