use std::collections::HashSet;

use serde::Serialize;

use crate::auth::{AuthenticatedUser, PasswordError, hash_password, verify_password};
use crate::domain::user::{User, UserListQuery};
use crate::forms::users::{LoginForm, RegisterUserForm, SetPasswordForm, UserFormError};
use crate::pagination::{PageQuery, Paginated};
use crate::repository::{RepositoryError, SubscriptionReader, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// Public representation of a user as seen by the caller.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the caller follows this user. Always `false` for anonymous callers.
    pub is_subscribed: bool,
}

impl UserView {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

fn form_error(err: UserFormError) -> ServiceError {
    match err {
        UserFormError::Password(PasswordError::Hash) => {
            ServiceError::Internal("failed to hash password".to_string())
        }
        other => ServiceError::Form(other.to_string()),
    }
}

/// Authors among `author_ids` followed by `viewer`.
pub(crate) fn followed_authors<R>(
    repo: &R,
    viewer: Option<&AuthenticatedUser>,
    author_ids: &[i32],
) -> ServiceResult<HashSet<i32>>
where
    R: SubscriptionReader + ?Sized,
{
    match viewer {
        Some(viewer) => repo
            .subscribed_author_ids(viewer.id, author_ids)
            .map_err(ServiceError::from),
        None => Ok(HashSet::new()),
    }
}

/// Allow the call only when `user` is staff according to the stored record.
///
/// Session claims are a login-time snapshot; the stored flag wins.
pub(crate) fn ensure_staff<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<()>
where
    R: UserReader + ?Sized,
{
    if !user.is_staff {
        return Err(ServiceError::Forbidden);
    }

    let stored = repo
        .get_user_by_id(user.id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::Unauthorized)?;

    if stored.is_staff {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Registers a new account.
pub fn register_user<R>(repo: &R, form: RegisterUserForm) -> ServiceResult<UserView>
where
    R: UserWriter + ?Sized,
{
    let new_user = form.into_new_user().map_err(form_error)?;

    match repo.create_user(&new_user) {
        Ok(user) => Ok(UserView::new(user, false)),
        Err(RepositoryError::Duplicate(_)) => Err(ServiceError::Duplicate(
            "A user with this email or username already exists".to_string(),
        )),
        Err(err) => Err(ServiceError::from(err)),
    }
}

/// Lists users page by page, flagging the ones the caller follows.
pub fn load_users<R>(
    repo: &R,
    viewer: Option<&AuthenticatedUser>,
    query: &PageQuery,
) -> ServiceResult<Paginated<UserView>>
where
    R: UserReader + SubscriptionReader + ?Sized,
{
    let pagination = query.pagination();
    let list_query = UserListQuery::new().paginate(pagination.page, pagination.per_page);

    let (total, users) = repo.list_users(list_query).map_err(ServiceError::from)?;

    let ids: Vec<i32> = users.iter().map(|user| user.id).collect();
    let followed = followed_authors(repo, viewer, &ids)?;

    let items = users
        .into_iter()
        .map(|user| {
            let is_subscribed = followed.contains(&user.id);
            UserView::new(user, is_subscribed)
        })
        .collect();

    Ok(Paginated::new(items, total, pagination))
}

pub fn load_user<R>(
    repo: &R,
    viewer: Option<&AuthenticatedUser>,
    user_id: i32,
) -> ServiceResult<UserView>
where
    R: UserReader + SubscriptionReader + ?Sized,
{
    let user = repo
        .get_user_by_id(user_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let is_subscribed = match viewer {
        Some(viewer) => repo
            .is_subscribed(viewer.id, user.id)
            .map_err(ServiceError::from)?,
        None => false,
    };

    Ok(UserView::new(user, is_subscribed))
}

/// Profile of the logged-in user. A session pointing at a deleted account is
/// treated as anonymous.
pub fn current_user<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<UserView>
where
    R: UserReader + ?Sized,
{
    repo.get_user_by_id(user.id)
        .map_err(ServiceError::from)?
        .map(|user| UserView::new(user, false))
        .ok_or(ServiceError::Unauthorized)
}

/// Replaces the caller's password after checking the current one.
pub fn change_password<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SetPasswordForm,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    let form = form.validated().map_err(form_error)?;

    let credentials = repo
        .get_credentials_by_id(user.id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::Unauthorized)?;

    if verify_password(&form.current_password, &credentials.password_hash).is_err() {
        return Err(ServiceError::Form(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = hash_password(&form.new_password)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;

    repo.update_password(user.id, &password_hash)
        .map_err(ServiceError::from)
}

/// Checks login credentials and returns the claims to store in the session.
pub fn authenticate<R>(repo: &R, form: LoginForm) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + ?Sized,
{
    let invalid = || ServiceError::Form("Unable to log in with provided credentials".to_string());

    let credentials = repo
        .get_credentials_by_email(&form.email)
        .map_err(ServiceError::from)?
        .ok_or_else(invalid)?;

    verify_password(&form.password, &credentials.password_hash).map_err(|_| invalid())?;

    log::info!("User {} logged in", credentials.user.id);

    Ok(AuthenticatedUser::from(&credentials.user))
}
