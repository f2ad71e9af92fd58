use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::recipe::{RecipeListQuery, RecipeSummary};
use crate::domain::user::User;
use crate::pagination::{MAX_ITEMS_PER_PAGE, PageQuery, Paginated};
use crate::repository::{
    RecipeReader, RepositoryError, SubscriptionReader, SubscriptionWriter, UserReader,
};
use crate::services::users::UserView;
use crate::services::{ServiceError, ServiceResult};

/// Number of recipes embedded per author when `recipes_limit` is absent.
pub const DEFAULT_RECIPES_LIMIT: usize = 10;

/// Query parameters of the subscription endpoints.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SubscriptionQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub recipes_limit: Option<usize>,
}

impl SubscriptionQuery {
    fn recipes_limit(&self) -> usize {
        self.recipes_limit
            .unwrap_or(DEFAULT_RECIPES_LIMIT)
            .min(MAX_ITEMS_PER_PAGE)
    }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthorView {
    #[serde(flatten)]
    pub user: UserView,
    /// Newest recipes first, at most `recipes_limit` of them.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by this author.
    pub recipes_count: usize,
}

fn author_view<R>(repo: &R, author: User, recipes_limit: usize) -> ServiceResult<AuthorView>
where
    R: RecipeReader + ?Sized,
{
    let (recipes_count, recipes) = if recipes_limit == 0 {
        // Still need the count.
        let (count, _) = repo
            .list_recipes(RecipeListQuery::new().author(author.id).paginate(1, 1))
            .map_err(ServiceError::from)?;
        (count, Vec::new())
    } else {
        repo.list_recipes(
            RecipeListQuery::new()
                .author(author.id)
                .paginate(1, recipes_limit),
        )
        .map_err(ServiceError::from)?
    };

    Ok(AuthorView {
        user: UserView::new(author, true),
        recipes: recipes.iter().map(RecipeSummary::from).collect(),
        recipes_count,
    })
}

/// Follows `author_id` and returns the author with a recipe preview.
pub fn subscribe<R>(
    repo: &R,
    user: &AuthenticatedUser,
    author_id: i32,
    query: &SubscriptionQuery,
) -> ServiceResult<AuthorView>
where
    R: UserReader + RecipeReader + SubscriptionReader + SubscriptionWriter + ?Sized,
{
    let author = repo
        .get_user_by_id(author_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if author.id == user.id {
        return Err(ServiceError::SelfSubscription);
    }

    let already = || ServiceError::Duplicate("You are already subscribed to this author".into());

    if repo
        .is_subscribed(user.id, author_id)
        .map_err(ServiceError::from)?
    {
        return Err(already());
    }

    match repo.subscribe(user.id, author_id) {
        Ok(()) => {}
        Err(RepositoryError::Duplicate(_)) => return Err(already()),
        Err(err) => return Err(ServiceError::from(err)),
    }

    author_view(repo, author, query.recipes_limit())
}

/// Stops following `author_id`.
pub fn unsubscribe<R>(repo: &R, user: &AuthenticatedUser, author_id: i32) -> ServiceResult<()>
where
    R: UserReader + SubscriptionWriter + ?Sized,
{
    repo.get_user_by_id(author_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    match repo.unsubscribe(user.id, author_id) {
        Ok(()) => Ok(()),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotAssociated(
            "You are not subscribed to this author".to_string(),
        )),
        Err(err) => Err(ServiceError::from(err)),
    }
}

/// Lists the authors the caller follows, ordered by username.
pub fn load_subscriptions<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: &SubscriptionQuery,
) -> ServiceResult<Paginated<AuthorView>>
where
    R: RecipeReader + SubscriptionReader + ?Sized,
{
    let pagination = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .pagination();
    let recipes_limit = query.recipes_limit();

    let (total, authors) = repo
        .list_subscriptions(user.id, Some(pagination))
        .map_err(ServiceError::from)?;

    let items = authors
        .into_iter()
        .map(|author| author_view(repo, author, recipes_limit))
        .collect::<ServiceResult<Vec<_>>>()?;

    Ok(Paginated::new(items, total, pagination))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::recipe::Recipe;
    use crate::repository::mock::MockRepository;

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 1,
            email: "reader@example.com".to_string(),
            username: "reader".to_string(),
            is_staff: false,
        }
    }

    fn sample_user(id: i32) -> User {
        User {
            id,
            email: format!("author{id}@example.com"),
            username: format!("author{id}"),
            first_name: "Au".to_string(),
            last_name: "Thor".to_string(),
            is_staff: false,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn sample_recipe(id: i32, author_id: i32) -> Recipe {
        Recipe {
            id,
            author_id,
            name: format!("Recipe {id}"),
            image: None,
            text: "Stir.".to_string(),
            cooking_time: 5,
            ingredients: Vec::new(),
            tags: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn subscribe_to_self_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        repo.expect_subscribe().never();

        assert!(matches!(
            subscribe(&repo, &caller(), 1, &SubscriptionQuery::default()),
            Err(ServiceError::SelfSubscription)
        ));
    }

    #[test]
    fn subscribe_to_missing_author_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id().returning(|_| Ok(None));

        assert!(matches!(
            subscribe(&repo, &caller(), 8, &SubscriptionQuery::default()),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn subscribe_twice_is_duplicate() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        repo.expect_is_subscribed().returning(|_, _| Ok(true));
        repo.expect_subscribe().never();

        assert!(matches!(
            subscribe(&repo, &caller(), 2, &SubscriptionQuery::default()),
            Err(ServiceError::Duplicate(_))
        ));
    }

    #[test]
    fn subscribe_returns_author_with_limited_recipes() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        repo.expect_is_subscribed().returning(|_, _| Ok(false));
        repo.expect_subscribe()
            .times(1)
            .withf(|user_id, author_id| *user_id == 1 && *author_id == 2)
            .returning(|_, _| Ok(()));
        repo.expect_list_recipes()
            .times(1)
            .withf(|query| {
                query.author_id == Some(2)
                    && query
                        .pagination
                        .is_some_and(|pagination| pagination.page == 1 && pagination.per_page == 2)
            })
            .returning(|_| Ok((5, vec![sample_recipe(9, 2), sample_recipe(8, 2)])));

        let query = SubscriptionQuery {
            recipes_limit: Some(2),
            ..SubscriptionQuery::default()
        };
        let view = subscribe(&repo, &caller(), 2, &query).expect("expected success");

        assert!(view.user.is_subscribed);
        assert_eq!(view.recipes_count, 5);
        assert_eq!(view.recipes.len(), 2);
        assert_eq!(view.recipes[0].id, 9);

        let json = serde_json::to_value(&view).expect("serializes");
        assert_eq!(json["username"], "author2");
        assert_eq!(json["recipes_count"], 5);
    }

    #[test]
    fn unsubscribe_when_not_following_is_not_associated() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(sample_user(id))));
        repo.expect_unsubscribe()
            .times(1)
            .returning(|_, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            unsubscribe(&repo, &caller(), 2),
            Err(ServiceError::NotAssociated(_))
        ));
    }

    #[test]
    fn load_subscriptions_uses_default_recipes_limit() {
        let mut repo = MockRepository::new();
        repo.expect_list_subscriptions()
            .times(1)
            .withf(|user_id, pagination| *user_id == 1 && pagination.is_some())
            .returning(|_, _| Ok((2, vec![sample_user(2), sample_user(3)])));
        repo.expect_list_recipes()
            .times(2)
            .withf(|query| {
                query
                    .pagination
                    .is_some_and(|pagination| pagination.per_page == DEFAULT_RECIPES_LIMIT)
            })
            .returning(|query| {
                let author_id = query.author_id.unwrap_or_default();
                Ok((1, vec![sample_recipe(author_id * 10, author_id)]))
            });

        let page = load_subscriptions(&repo, &caller(), &SubscriptionQuery::default())
            .expect("expected success");

        assert_eq!(page.count, 2);
        assert_eq!(page.items[0].user.username, "author2");
        assert_eq!(page.items[1].recipes[0].id, 30);
    }

    #[test]
    fn zero_recipes_limit_still_counts() {
        let mut repo = MockRepository::new();
        repo.expect_list_subscriptions()
            .returning(|_, _| Ok((1, vec![sample_user(2)])));
        repo.expect_list_recipes()
            .returning(|_| Ok((4, vec![sample_recipe(1, 2)])));

        let query = SubscriptionQuery {
            recipes_limit: Some(0),
            ..SubscriptionQuery::default()
        };
        let page = load_subscriptions(&repo, &caller(), &query).expect("expected success");

        assert_eq!(page.items[0].recipes_count, 4);
        assert!(page.items[0].recipes.is_empty());
    }
}
