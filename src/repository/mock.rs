use std::collections::HashSet;

use mockall::mock;

use super::{
    CartReader, CartWriter, FavoriteReader, FavoriteWriter, IngredientReader, IngredientWriter,
    RecipeReader, RecipeWriter, RepositoryResult, SubscriptionReader, SubscriptionWriter,
    TagReader, TagWriter, UserReader, UserWriter,
};
use crate::domain::{
    ingredient::{Ingredient, IngredientListQuery, NewIngredient},
    recipe::{NewRecipe, Recipe, RecipeListQuery, UpdateRecipe},
    shopping_list::CartLine,
    tag::{NewTag, Tag, TagListQuery},
    user::{NewUser, User, UserCredentials, UserListQuery},
};
use crate::pagination::Pagination;

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_users_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<User>>;
        fn get_credentials_by_email(&self, email: &str) -> RepositoryResult<Option<UserCredentials>>;
        fn get_credentials_by_id(&self, id: i32) -> RepositoryResult<Option<UserCredentials>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_password(&self, user_id: i32, password_hash: &str) -> RepositoryResult<()>;
    }

    impl IngredientReader for Repository {
        fn get_ingredient_by_id(&self, id: i32) -> RepositoryResult<Option<Ingredient>>;
        fn list_ingredients(&self, query: IngredientListQuery) -> RepositoryResult<(usize, Vec<Ingredient>)>;
    }

    impl IngredientWriter for Repository {
        fn create_ingredient(&self, new_ingredient: &NewIngredient) -> RepositoryResult<Ingredient>;
        fn create_ingredients(&self, new_ingredients: &[NewIngredient]) -> RepositoryResult<usize>;
    }

    impl TagReader for Repository {
        fn get_tag_by_id(&self, id: i32) -> RepositoryResult<Option<Tag>>;
        fn list_tags(&self, query: TagListQuery) -> RepositoryResult<(usize, Vec<Tag>)>;
    }

    impl TagWriter for Repository {
        fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    }

    impl RecipeReader for Repository {
        fn get_recipe_by_id(&self, id: i32) -> RepositoryResult<Option<Recipe>>;
        fn list_recipes(&self, query: RecipeListQuery) -> RepositoryResult<(usize, Vec<Recipe>)>;
    }

    impl RecipeWriter for Repository {
        fn create_recipe(&self, new_recipe: &NewRecipe) -> RepositoryResult<Recipe>;
        fn update_recipe(&self, recipe_id: i32, updates: &UpdateRecipe) -> RepositoryResult<Recipe>;
        fn delete_recipe(&self, recipe_id: i32) -> RepositoryResult<()>;
    }

    impl FavoriteReader for Repository {
        fn is_favorited(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<bool>;
        fn favorited_recipe_ids(&self, user_id: i32, recipe_ids: &[i32]) -> RepositoryResult<HashSet<i32>>;
    }

    impl FavoriteWriter for Repository {
        fn add_favorite(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
        fn remove_favorite(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
    }

    impl CartReader for Repository {
        fn is_in_cart(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<bool>;
        fn cart_recipe_ids(&self, user_id: i32, recipe_ids: &[i32]) -> RepositoryResult<HashSet<i32>>;
        fn list_cart_lines(&self, user_id: i32) -> RepositoryResult<Vec<CartLine>>;
    }

    impl CartWriter for Repository {
        fn add_to_cart(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
        fn remove_from_cart(&self, user_id: i32, recipe_id: i32) -> RepositoryResult<()>;
    }

    impl SubscriptionReader for Repository {
        fn is_subscribed(&self, user_id: i32, author_id: i32) -> RepositoryResult<bool>;
        fn subscribed_author_ids(&self, user_id: i32, author_ids: &[i32]) -> RepositoryResult<HashSet<i32>>;
        fn list_subscriptions(&self, user_id: i32, pagination: Option<Pagination>) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl SubscriptionWriter for Repository {
        fn subscribe(&self, user_id: i32, author_id: i32) -> RepositoryResult<()>;
        fn unsubscribe(&self, user_id: i32, author_id: i32) -> RepositoryResult<()>;
    }
}
