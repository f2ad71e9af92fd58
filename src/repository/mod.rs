use std::collections::HashSet;

use crate::db::{DbConnection, DbPool};
use crate::domain::ingredient::{Ingredient, IngredientListQuery, NewIngredient};
use crate::domain::recipe::{NewRecipe, Recipe, RecipeListQuery, UpdateRecipe};
use crate::domain::shopping_list::CartLine;
use crate::domain::tag::{NewTag, Tag, TagListQuery};
use crate::domain::user::{NewUser, User, UserCredentials, UserListQuery};
use crate::pagination::Pagination;

pub mod cart;
pub mod errors;
pub mod favorite;
pub mod ingredient;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Escape character used by [`prefix_pattern`] patterns.
pub(crate) const LIKE_ESCAPE: char = '\\';

/// `LIKE` pattern matching values that start with `prefix` literally.
///
/// Use together with `.escape(LIKE_ESCAPE)`.
pub(crate) fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Read-only operations over user records.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<User>>;
    fn get_credentials_by_email(&self, email: &str) -> RepositoryResult<Option<UserCredentials>>;
    fn get_credentials_by_id(&self, id: i32) -> RepositoryResult<Option<UserCredentials>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over user records.
pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_password(&self, user_id: i32, password_hash: &str) -> RepositoryResult<()>;
}

/// Read-only operations over the ingredient registry.
pub trait IngredientReader {
    fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
    fn list_ingredients(
        &self,
        query: IngredientListQuery,
    ) -> RepositoryResult<(usize, Vec<Ingredient>)>;
}

/// Write operations over the ingredient registry.
pub trait IngredientWriter {
    fn create_ingredient(&self, new_ingredient: &NewIngredient) -> RepositoryResult<Ingredient>;
    /// Insert all ingredients in one transaction; returns the number inserted.
    fn create_ingredients(&self, new_ingredients: &[NewIngredient]) -> RepositoryResult<usize>;
}

/// Read-only operations over tag records.
pub trait TagReader {
    fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
    fn list_tags(&self, query: TagListQuery) -> RepositoryResult<(usize, Vec<Tag>)>;
}

/// Write operations over tag records.
pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
}

/// Read-only operations over recipes, including their quantities and tags.
pub trait RecipeReader {
    fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<Recipe>>;
    fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
}

/// Write operations over recipes. Each call is a single transaction.
pub trait RecipeWriter {
    fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
    /// Replace the recipe's fields, quantities and tags.
    fn update_recipe(&self, recipe_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Recipe>;
    fn delete_recipe(&self, recipe_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over favorite recipes.
pub trait FavoriteReader {
    fn is_favorited(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<bool>;
    /// Subset of `recipe_ids` the user has favorited.
    fn favorited_recipe_ids(
        &self,
        user_id: i32,
        recipe_ids: &[i32],
    ) -> RepositoryResult<HashSet<i32>>;
}

/// Write operations over favorite recipes.
pub trait FavoriteWriter {
    fn add_favorite(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
    /// Fails with [`RepositoryError::NotFound`] when the pair does not exist.
    fn remove_favorite(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over shopping carts.
pub trait CartReader {
    fn is_in_cart(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<bool>;
    /// Subset of `recipe_ids` the user has in the cart.
    fn cart_recipe_ids(&self, user_id: i32, recipe_ids: &[i32]) -> RepositoryResult<HashSet<i32>>;
    /// Every quantity row of every recipe in the user's cart.
    fn list_cart_lines(&self, user_id: i32) -> RepositoryResult<Vec<CartLine>>;
}

/// Write operations over shopping carts.
pub trait CartWriter {
    fn add_to_cart(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
    /// Fails with [`RepositoryError::NotFound`] when the pair does not exist.
    fn remove_from_cart(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over follow relationships.
pub trait SubscriptionReader {
    fn is_subscribed(&self, user_id: i32, author_id: i32) -> RepositoryResult<bool>;
    /// Subset of `author_ids` the user follows.
    fn subscribed_author_ids(
        &self,
        user_id: i32,
        author_ids: &[i32],
    ) -> RepositoryResult<HashSet<i32>>;
    /// Authors followed by the user, ordered by username.
    fn list_subscriptions(
        &self,
        user_id: i32,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<(usize, Vec<User>)>;
}

/// Write operations over follow relationships.
pub trait SubscriptionWriter {
    fn subscribe(&self, user_id: i32, author_id: i32) -> RepositoryResult<()>;
    /// Fails with [`RepositoryError::NotFound`] when the pair does not exist.
    fn unsubscribe(&self, user_id: i32, author_id: i32) -> RepositoryResult<()>;
}
