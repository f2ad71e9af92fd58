use crate::auth::AuthenticatedUser;
use crate::domain::recipe::RecipeSummary;
use crate::repository::{FavoriteReader, FavoriteWriter, RecipeReader, RepositoryError};
use crate::services::{ServiceError, ServiceResult};

const ALREADY_FAVORITED: &str = "Recipe is already in favorites";
const NOT_FAVORITED: &str = "Recipe is not in favorites";

/// Adds a recipe to the caller's favorites and returns its short form.
pub fn add_favorite<R>(
    repo: &R,
    user: &AuthenticatedUser,
    recipe_id: i32,
) -> ServiceResult<RecipeSummary>
where
    R: RecipeReader + FavoriteReader + FavoriteWriter + ?Sized,
{
    let recipe = repo
        .get_recipe_by_id(recipe_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if repo
        .is_favorited(user.id, recipe_id)
        .map_err(ServiceError::from)?
    {
        return Err(ServiceError::Duplicate(ALREADY_FAVORITED.to_string()));
    }

    // A concurrent request may win the race past the check above.
    match repo.add_favorite(user.id, recipe_id) {
        Ok(()) => Ok(RecipeSummary::from(&recipe)),
        Err(RepositoryError::Duplicate(_)) => {
            Err(ServiceError::Duplicate(ALREADY_FAVORITED.to_string()))
        }
        Err(err) => Err(ServiceError::from(err)),
    }
}

/// Removes a recipe from the caller's favorites.
pub fn remove_favorite<R>(repo: &R, user: &AuthenticatedUser, recipe_id: i32) -> ServiceResult<()>
where
    R: RecipeReader + FavoriteWriter + ?Sized,
{
    repo.get_recipe_by_id(recipe_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    match repo.remove_favorite(user.id, recipe_id) {
        Ok(()) => Ok(()),
        Err(RepositoryError::NotFound) => {
            Err(ServiceError::NotAssociated(NOT_FAVORITED.to_string()))
        }
        Err(err) => Err(ServiceError::from(err)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::recipe::Recipe;
    use crate::repository::mock::MockRepository;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 2,
            email: "fan@example.com".to_string(),
            username: "fan".to_string(),
            is_staff: false,
        }
    }

    fn sample_recipe(id: i32) -> Recipe {
        Recipe {
            id,
            author_id: 9,
            name: "Borscht".to_string(),
            image: Some("borscht.png".to_string()),
            text: "Simmer.".to_string(),
            cooking_time: 90,
            ingredients: Vec::new(),
            tags: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn add_favorite_returns_summary() {
        let mut repo = MockRepository::new();
        repo.expect_get_recipe_by_id()
            .returning(|id| Ok(Some(sample_recipe(id))));
        repo.expect_is_favorited().returning(|_, _| Ok(false));
        repo.expect_add_favorite()
            .times(1)
            .withf(|user_id, recipe_id| *user_id == 2 && *recipe_id == 5)
            .returning(|_, _| Ok(()));

        let summary = add_favorite(&repo, &user(), 5).expect("expected success");

        assert_eq!(
            summary,
            RecipeSummary {
                id: 5,
                name: "Borscht".to_string(),
                image: Some("borscht.png".to_string()),
                cooking_time: 90,
            }
        );
    }

    #[test]
    fn add_favorite_twice_is_duplicate() {
        let mut repo = MockRepository::new();
        repo.expect_get_recipe_by_id()
            .returning(|id| Ok(Some(sample_recipe(id))));
        repo.expect_is_favorited().returning(|_, _| Ok(true));
        repo.expect_add_favorite().never();

        assert!(matches!(
            add_favorite(&repo, &user(), 5),
            Err(ServiceError::Duplicate(_))
        ));
    }

    #[test]
    fn add_favorite_race_maps_constraint_to_duplicate() {
        let mut repo = MockRepository::new();
        repo.expect_get_recipe_by_id()
            .returning(|id| Ok(Some(sample_recipe(id))));
        repo.expect_is_favorited().returning(|_, _| Ok(false));
        repo.expect_add_favorite()
            .returning(|_, _| Err(RepositoryError::Duplicate("favorites".to_string())));

        match add_favorite(&repo, &user(), 5) {
            Err(ServiceError::Duplicate(message)) => assert_eq!(message, ALREADY_FAVORITED),
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[test]
    fn add_favorite_for_missing_recipe_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_recipe_by_id().returning(|_| Ok(None));
        repo.expect_add_favorite().never();

        assert!(matches!(
            add_favorite(&repo, &user(), 5),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn remove_missing_favorite_is_not_associated() {
        let mut repo = MockRepository::new();
        repo.expect_get_recipe_by_id()
            .returning(|id| Ok(Some(sample_recipe(id))));
        repo.expect_remove_favorite()
            .times(1)
            .returning(|_, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            remove_favorite(&repo, &user(), 5),
            Err(ServiceError::NotAssociated(_))
        ));
    }
}
