use crate::auth::AuthenticatedUser;
use crate::domain::tag::{Tag, TagListQuery};
use crate::forms::tags::AddTagForm;
use crate::pagination::{PageQuery, Paginated};
use crate::repository::{RepositoryError, TagReader, TagWriter, UserReader};
use crate::services::users::ensure_staff;
use crate::services::{ServiceError, ServiceResult};

/// Fetches a page of tags ordered by name.
pub fn load_tags<R>(repo: &R, query: &PageQuery) -> ServiceResult<Paginated<Tag>>
where
    R: TagReader + ?Sized,
{
    let pagination = query.pagination();
    let list_query = TagListQuery::new().paginate(pagination.page, pagination.per_page);

    let (total, tags) = repo.list_tags(list_query).map_err(ServiceError::from)?;

    Ok(Paginated::new(tags, total, pagination))
}

pub fn load_tag<R>(repo: &R, tag_id: i32) -> ServiceResult<Tag>
where
    R: TagReader + ?Sized,
{
    repo.get_tag_by_id(tag_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a new tag. Staff only.
pub fn create_tag<R>(repo: &R, user: &AuthenticatedUser, form: AddTagForm) -> ServiceResult<Tag>
where
    R: TagWriter + UserReader + ?Sized,
{
    ensure_staff(repo, user)?;

    let new_tag = form
        .into_new_tag()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    match repo.create_tag(&new_tag) {
        Ok(tag) => Ok(tag),
        Err(RepositoryError::Duplicate(_)) => Err(ServiceError::Duplicate(format!(
            "Tag with slug `{}` already exists",
            new_tag.slug
        ))),
        Err(err) => Err(ServiceError::from(err)),
    }
}
