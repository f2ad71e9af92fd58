use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::recipe::{Recipe, RecipeIngredient, RecipeListQuery};
use crate::domain::tag::Tag;
use crate::forms::recipes::RecipeForm;
use crate::pagination::{PageQuery, Paginated};
use crate::repository::{
    CartReader, FavoriteReader, RecipeReader, RecipeWriter, RepositoryError, SubscriptionReader,
    UserReader,
};
use crate::services::users::{UserView, followed_authors};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the recipe list endpoint.
///
/// `tags` may be repeated (`?tags=breakfast&tags=lunch`) and matches recipes
/// carrying any of them. The two flags accept `1`/`0` and `true`/`false`.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub author: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_favorited: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_in_shopping_cart: Option<bool>,
    pub search: Option<String>,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("1") | Some("true") | Some("True") => Ok(Some(true)),
        Some("0") | Some("false") | Some("False") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected 0, 1, true or false, got `{other}`"
        ))),
    }
}

/// Full recipe representation returned by the API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipeView {
    pub id: i32,
    pub author: UserView,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<RecipeIngredient>,
    pub tags: Vec<Tag>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Attach authors and the caller's favorite, cart and subscription flags.
fn build_views<R>(
    repo: &R,
    viewer: Option<&AuthenticatedUser>,
    recipes: Vec<Recipe>,
) -> ServiceResult<Vec<RecipeView>>
where
    R: UserReader + FavoriteReader + CartReader + SubscriptionReader + ?Sized,
{
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.id).collect();
    let mut author_ids: Vec<i32> = recipes.iter().map(|recipe| recipe.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<i32, _> = repo
        .get_users_by_ids(&author_ids)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();
    let followed = followed_authors(repo, viewer, &author_ids)?;

    let (favorited, in_cart) = match viewer {
        Some(viewer) => (
            repo.favorited_recipe_ids(viewer.id, &recipe_ids)
                .map_err(ServiceError::from)?,
            repo.cart_recipe_ids(viewer.id, &recipe_ids)
                .map_err(ServiceError::from)?,
        ),
        None => Default::default(),
    };

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                ServiceError::Internal(format!("author of recipe {} is missing", recipe.id))
            })?;
            let is_subscribed = followed.contains(&author.id);

            Ok(RecipeView {
                id: recipe.id,
                author: UserView::new(author, is_subscribed),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                name: recipe.name,
                image: recipe.image,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
                ingredients: recipe.ingredients,
                tags: recipe.tags,
                created_at: recipe.created_at,
                updated_at: recipe.updated_at,
            })
        })
        .collect()
}

fn build_view<R>(
    repo: &R,
    viewer: Option<&AuthenticatedUser>,
    recipe: Recipe,
) -> ServiceResult<RecipeView>
where
    R: UserReader + FavoriteReader + CartReader + SubscriptionReader + ?Sized,
{
    build_views(repo, viewer, vec![recipe])?
        .pop()
        .ok_or_else(|| ServiceError::Internal("recipe view was not built".to_string()))
}

fn duplicate_name(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::Duplicate(_) => {
            ServiceError::Duplicate("A recipe with this name already exists".to_string())
        }
        other => ServiceError::from(other),
    }
}

/// Lists recipes newest first. Membership flags are ignored for anonymous callers.
pub fn load_recipes<R>(
    repo: &R,
    viewer: Option<&AuthenticatedUser>,
    query: RecipeQuery,
) -> ServiceResult<Paginated<RecipeView>>
where
    R: RecipeReader + UserReader + FavoriteReader + CartReader + SubscriptionReader + ?Sized,
{
    let pagination = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .pagination();

    let mut list_query = RecipeListQuery::new();

    if let Some(author_id) = query.author {
        list_query = list_query.author(author_id);
    }

    let slugs: Vec<String> = query
        .tags
        .iter()
        .map(|slug| slug.trim().to_lowercase())
        .filter(|slug| !slug.is_empty())
        .collect();
    if !slugs.is_empty() {
        list_query = list_query.tags(slugs);
    }

    if let Some(viewer) = viewer {
        if let Some(is_member) = query.is_favorited {
            list_query = list_query.favorited(viewer.id, is_member);
        }
        if let Some(is_member) = query.is_in_shopping_cart {
            list_query = list_query.in_shopping_cart(viewer.id, is_member);
        }
    }

    if let Some(search) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|search| !search.is_empty())
    {
        list_query = list_query.search(search);
    }

    list_query = list_query.paginate(pagination.page, pagination.per_page);

    let (total, recipes) = repo.list_recipes(list_query).map_err(ServiceError::from)?;
    let items = build_views(repo, viewer, recipes)?;

    Ok(Paginated::new(items, total, pagination))
}

pub fn load_recipe<R>(
    repo: &R,
    viewer: Option<&AuthenticatedUser>,
    recipe_id: i32,
) -> ServiceResult<RecipeView>
where
    R: RecipeReader + UserReader + FavoriteReader + CartReader + SubscriptionReader + ?Sized,
{
    let recipe = repo
        .get_recipe_by_id(recipe_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    build_view(repo, viewer, recipe)
}

/// Creates a recipe authored by the caller.
pub fn create_recipe<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: RecipeForm,
) -> ServiceResult<RecipeView>
where
    R: RecipeWriter + UserReader + FavoriteReader + CartReader + SubscriptionReader + ?Sized,
{
    let new_recipe = form
        .into_new_recipe(user.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let recipe = repo.create_recipe(&new_recipe).map_err(duplicate_name)?;

    log::info!("User {} created recipe {}", user.id, recipe.id);

    build_view(repo, Some(user), recipe)
}

/// Replaces a recipe. Only its author or a staff user may do so.
pub fn modify_recipe<R>(
    repo: &R,
    user: &AuthenticatedUser,
    recipe_id: i32,
    form: RecipeForm,
) -> ServiceResult<RecipeView>
where
    R: RecipeReader
        + RecipeWriter
        + UserReader
        + FavoriteReader
        + CartReader
        + SubscriptionReader
        + ?Sized,
{
    let existing = repo
        .get_recipe_by_id(recipe_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if !user.can_edit(existing.author_id) {
        return Err(ServiceError::Forbidden);
    }

    let updates = form
        .into_update_recipe(Utc::now().naive_utc())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let recipe = repo
        .update_recipe(recipe_id, &updates)
        .map_err(duplicate_name)?;

    build_view(repo, Some(user), recipe)
}

/// Deletes a recipe together with its quantities, favorites and cart entries.
pub fn remove_recipe<R>(repo: &R, user: &AuthenticatedUser, recipe_id: i32) -> ServiceResult<()>
where
    R: RecipeReader + RecipeWriter + ?Sized,
{
    let existing = repo
        .get_recipe_by_id(recipe_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if !user.can_edit(existing.author_id) {
        return Err(ServiceError::Forbidden);
    }

    repo.delete_recipe(recipe_id).map_err(ServiceError::from)?;

    log::info!("User {} deleted recipe {recipe_id}", user.id);

    Ok(())
}
