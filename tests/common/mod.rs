//! Helpers for integration tests.
#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use pushkind_recipes::db::{DbPool, establish_connection_pool};
use pushkind_recipes::domain::ingredient::{Ingredient, NewIngredient};
use pushkind_recipes::domain::recipe::{IngredientAmount, NewRecipe, Recipe};
use pushkind_recipes::domain::tag::{NewTag, Tag};
use pushkind_recipes::domain::user::{NewUser, User};
use pushkind_recipes::repository::{
    DieselRepository, IngredientWriter, RecipeWriter, TagWriter, UserWriter,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn create_user(repo: &DieselRepository, username: &str) -> User {
    let new_user = NewUser::new(
        format!("{username}@example.com"),
        username,
        "Test",
        "User",
        "not-a-real-hash",
    );
    repo.create_user(&new_user).expect("user created")
}

pub fn create_ingredient(repo: &DieselRepository, name: &str, unit: &str) -> Ingredient {
    repo.create_ingredient(&NewIngredient::new(name, unit))
        .expect("ingredient created")
}

pub fn create_tag(repo: &DieselRepository, slug: &str) -> Tag {
    repo.create_tag(&NewTag::new(slug.to_uppercase(), slug, "#00AA00"))
        .expect("tag created")
}

pub fn create_recipe(
    repo: &DieselRepository,
    author_id: i32,
    name: &str,
    ingredients: &[(i32, f64)],
    tag_ids: &[i32],
) -> Recipe {
    let new_recipe = NewRecipe {
        author_id,
        name: name.to_string(),
        image: None,
        text: format!("How to cook {name}."),
        cooking_time: 30,
        ingredients: ingredients
            .iter()
            .map(|&(ingredient_id, amount)| IngredientAmount {
                ingredient_id,
                amount,
            })
            .collect(),
        tag_ids: tag_ids.to_vec(),
    };
    repo.create_recipe(&new_recipe).expect("recipe created")
}
