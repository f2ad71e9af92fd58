use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::tag::Tag;
use crate::pagination::Pagination;

/// Domain representation of a recipe with its ingredient quantities and tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    /// Opaque reference to the recipe picture.
    pub image: Option<String>,
    pub text: String,
    /// Cooking time in minutes, at least 1.
    pub cooking_time: i32,
    /// Ingredient quantities in insertion order.
    pub ingredients: Vec<RecipeIngredient>,
    /// Tags ordered by name.
    pub tags: Vec<Tag>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One ingredient line of a recipe, resolved against the ingredient registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredient {
    /// Identifier of the referenced ingredient.
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: f64,
}

/// Ingredient reference with the amount a recipe needs, as submitted by a client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientAmount {
    pub ingredient_id: i32,
    pub amount: f64,
}

/// Compact recipe representation used in favorites, carts and subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Payload required to insert a recipe together with its quantities and tags.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub author_id: i32,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
    pub tag_ids: Vec<i32>,
}

/// Full replacement of a recipe's editable fields, quantities and tags.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRecipe {
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
    pub tag_ids: Vec<i32>,
    pub updated_at: NaiveDateTime,
}

/// Restricts a recipe listing by membership in one user's favorites or cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipFilter {
    pub user_id: i32,
    /// `true` keeps member recipes, `false` keeps everything else.
    pub is_member: bool,
}

/// Query definition used to filter and paginate recipes.
#[derive(Debug, Clone, Default)]
pub struct RecipeListQuery {
    pub author_id: Option<i32>,
    /// Recipes carrying any of these tag slugs.
    pub tag_slugs: Vec<String>,
    pub favorited: Option<MembershipFilter>,
    pub in_shopping_cart: Option<MembershipFilter>,
    /// Prefix the recipe name must start with.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl RecipeListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author_id: i32) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn tags<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_slugs = slugs.into_iter().map(Into::into).collect();
        self
    }

    pub fn favorited(mut self, user_id: i32, is_member: bool) -> Self {
        self.favorited = Some(MembershipFilter { user_id, is_member });
        self
    }

    pub fn in_shopping_cart(mut self, user_id: i32, is_member: bool) -> Self {
        self.in_shopping_cart = Some(MembershipFilter { user_id, is_member });
        self
    }

    pub fn search(mut self, prefix: impl Into<String>) -> Self {
        self.search = Some(prefix.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
