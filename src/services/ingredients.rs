use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::ingredient::{Ingredient, IngredientListQuery};
use crate::forms::ingredients::{AddIngredientForm, UploadIngredientsForm};
use crate::pagination::{PageQuery, Paginated};
use crate::repository::{IngredientReader, IngredientWriter, RepositoryError, UserReader};
use crate::services::users::ensure_staff;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the ingredient list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Fetches a page of ingredients, optionally filtered by name prefix.
pub fn load_ingredients<R>(
    repo: &R,
    query: IngredientQuery,
) -> ServiceResult<Paginated<Ingredient>>
where
    R: IngredientReader + ?Sized,
{
    let pagination = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .pagination();

    let mut list_query = IngredientListQuery::new();
    if let Some(prefix) = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|prefix| !prefix.is_empty())
    {
        list_query = list_query.name_prefix(prefix);
    }
    list_query = list_query.paginate(pagination.page, pagination.per_page);

    let (total, ingredients) = repo
        .list_ingredients(list_query)
        .map_err(ServiceError::from)?;

    Ok(Paginated::new(ingredients, total, pagination))
}

pub fn load_ingredient<R>(repo: &R, ingredient_id: i32) -> ServiceResult<Ingredient>
where
    R: IngredientReader + ?Sized,
{
    repo.get_ingredient_by_id(ingredient_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

fn duplicate_ingredient(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::Duplicate(_) => ServiceError::Duplicate(
            "Ingredient with this name and measurement unit already exists".to_string(),
        ),
        other => ServiceError::from(other),
    }
}

/// Registers a single ingredient. Staff only.
pub fn create_ingredient<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddIngredientForm,
) -> ServiceResult<Ingredient>
where
    R: IngredientWriter + UserReader + ?Sized,
{
    ensure_staff(repo, user)?;

    let new_ingredient = form
        .into_new_ingredient()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_ingredient(&new_ingredient)
        .map_err(duplicate_ingredient)
}

/// Imports ingredients from an uploaded CSV file in one transaction. Staff only.
pub fn import_ingredients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut form: UploadIngredientsForm,
) -> ServiceResult<usize>
where
    R: IngredientWriter + UserReader + ?Sized,
{
    ensure_staff(repo, user)?;

    let ingredients = form
        .into_new_ingredients()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if ingredients.is_empty() {
        return Ok(0);
    }

    let inserted = repo
        .create_ingredients(&ingredients)
        .map_err(duplicate_ingredient)?;

    log::info!("Imported {inserted} ingredients");

    Ok(inserted)
}
