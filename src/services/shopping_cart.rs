//! Shopping cart membership and the aggregated ingredient export.

use crate::auth::AuthenticatedUser;
use crate::domain::recipe::RecipeSummary;
use crate::domain::shopping_list::{ShoppingList, ShoppingListRow};
use crate::repository::{CartReader, CartWriter, RecipeReader, RepositoryError};
use crate::services::{ServiceError, ServiceResult};

/// File name suggested to the client for the export.
pub const EXPORT_FILE_NAME: &str = "shopping_cart.csv";

const ALREADY_IN_CART: &str = "Recipe is already in the shopping cart";
const NOT_IN_CART: &str = "Recipe is not in the shopping cart";

/// Adds a recipe to the caller's shopping cart and returns its short form.
pub fn add_to_cart<R>(
    repo: &R,
    user: &AuthenticatedUser,
    recipe_id: i32,
) -> ServiceResult<RecipeSummary>
where
    R: RecipeReader + CartReader + CartWriter + ?Sized,
{
    let recipe = repo
        .get_recipe_by_id(recipe_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if repo
        .is_in_cart(user.id, recipe_id)
        .map_err(ServiceError::from)?
    {
        return Err(ServiceError::Duplicate(ALREADY_IN_CART.to_string()));
    }

    match repo.add_to_cart(user.id, recipe_id) {
        Ok(()) => Ok(RecipeSummary::from(&recipe)),
        Err(RepositoryError::Duplicate(_)) => {
            Err(ServiceError::Duplicate(ALREADY_IN_CART.to_string()))
        }
        Err(err) => Err(ServiceError::from(err)),
    }
}

/// Removes a recipe from the caller's shopping cart.
pub fn remove_from_cart<R>(
    repo: &R,
    user: &AuthenticatedUser,
    recipe_id: i32,
) -> ServiceResult<()>
where
    R: RecipeReader + CartWriter + ?Sized,
{
    repo.get_recipe_by_id(recipe_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    match repo.remove_from_cart(user.id, recipe_id) {
        Ok(()) => Ok(()),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotAssociated(NOT_IN_CART.to_string())),
        Err(err) => Err(ServiceError::from(err)),
    }
}

/// Sums the ingredients of every recipe in the caller's cart.
pub fn load_shopping_list<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<ShoppingList>
where
    R: CartReader + ?Sized,
{
    let lines = repo
        .list_cart_lines(user.id)
        .map_err(ServiceError::from)?;

    ShoppingList::aggregate(lines).map_err(|err| ServiceError::Internal(err.to_string()))
}

/// Encode one row as a newline-terminated `name,total,unit` CSV record.
pub fn encode_row(row: &ShoppingListRow) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record([
        row.name.as_str(),
        row.total.to_string().as_str(),
        row.measurement_unit.as_str(),
    ])?;

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
