use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::recipe::{
    NewRecipe as DomainNewRecipe, Recipe as DomainRecipe, UpdateRecipe as DomainUpdateRecipe,
};

#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable)]
#[diesel(
    table_name = crate::schema::recipes,
    belongs_to(super::user::User, foreign_key = author_id)
)]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: i32,
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub text: &'a str,
    pub cooking_time: i32,
}

/// `image` is written even when `None` so a full update can clear it.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes, treat_none_as_null = true)]
pub struct UpdateRecipe<'a> {
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub text: &'a str,
    pub cooking_time: i32,
    pub updated_at: NaiveDateTime,
}

impl From<Recipe> for DomainRecipe {
    /// Converts the bare row; quantities and tags are attached by the repository.
    fn from(value: Recipe) -> Self {
        Self {
            id: value.id,
            author_id: value.author_id,
            name: value.name,
            image: value.image,
            text: value.text,
            cooking_time: value.cooking_time,
            ingredients: Vec::new(),
            tags: Vec::new(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewRecipe> for NewRecipe<'a> {
    fn from(value: &'a DomainNewRecipe) -> Self {
        Self {
            author_id: value.author_id,
            name: value.name.as_str(),
            image: value.image.as_deref(),
            text: value.text.as_str(),
            cooking_time: value.cooking_time,
        }
    }
}

impl<'a> From<&'a DomainUpdateRecipe> for UpdateRecipe<'a> {
    fn from(value: &'a DomainUpdateRecipe) -> Self {
        Self {
            name: value.name.as_str(),
            image: value.image.as_deref(),
            text: value.text.as_str(),
            cooking_time: value.cooking_time,
            updated_at: value.updated_at,
        }
    }
}
