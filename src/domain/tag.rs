use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Default display color for new tags.
pub const DEFAULT_TAG_COLOR: &str = "#FF0000";

/// Domain representation of a tag recipes can be labelled with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Unique identifier of the tag.
    pub id: i32,
    /// Human-readable name of the tag.
    pub name: String,
    /// Unique URL-safe identifier used for filtering.
    pub slug: String,
    /// Display color in `#RRGGBB` form.
    pub color: String,
}

/// Payload required to insert a new tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
    pub color: String,
}

impl NewTag {
    /// Construct a new tag payload with a trimmed name and lower-cased slug.
    pub fn new(name: impl Into<String>, slug: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            slug: slug.into().trim().to_lowercase(),
            color: color.into().trim().to_uppercase(),
        }
    }
}

/// Query definition used to list tags.
#[derive(Debug, Clone, Default)]
pub struct TagListQuery {
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl TagListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
