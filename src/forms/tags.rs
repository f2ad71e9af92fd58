use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::tag::{DEFAULT_TAG_COLOR, NewTag};
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for a tag name and slug.
const NAME_MAX_LEN: u64 = 200;

/// Result type returned by the tag form helpers.
pub type TagFormResult<T> = Result<T, TagFormError>;

/// Errors that can occur while processing tag forms.
#[derive(Debug, Error)]
pub enum TagFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("tag name cannot be empty")]
    EmptyName,
    #[error("slug may contain only latin letters, digits, '-' and '_'")]
    InvalidSlug,
    #[error("color must look like #RRGGBB")]
    InvalidColor,
}

/// Payload of the staff-only "create tag" endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct AddTagForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub slug: String,
    /// Falls back to [`DEFAULT_TAG_COLOR`] when omitted.
    #[serde(default)]
    pub color: Option<String>,
}

impl AddTagForm {
    /// Validates and sanitizes the payload into a domain `NewTag`.
    pub fn into_new_tag(self) -> TagFormResult<NewTag> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(TagFormError::EmptyName);
        }

        let slug = self.slug.trim();
        if !is_valid_slug(slug) {
            return Err(TagFormError::InvalidSlug);
        }

        let color = self
            .color
            .as_deref()
            .map(str::trim)
            .filter(|color| !color.is_empty())
            .unwrap_or(DEFAULT_TAG_COLOR);
        if !is_hex_color(color) {
            return Err(TagFormError::InvalidColor);
        }

        Ok(NewTag::new(sanitized_name, slug, color))
    }
}

fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tag_form_sanitizes_and_converts() {
        let form = AddTagForm {
            name: "  Quick \t Lunch  ".to_string(),
            slug: "Quick-Lunch".to_string(),
            color: Some("#00ff7f".to_string()),
        };

        let new_tag = form
            .into_new_tag()
            .expect("expected conversion to succeed");

        assert_eq!(new_tag.name, "Quick Lunch");
        assert_eq!(new_tag.slug, "quick-lunch");
        assert_eq!(new_tag.color, "#00FF7F");
    }

    #[test]
    fn add_tag_form_defaults_color() {
        let form = AddTagForm {
            name: "Breakfast".to_string(),
            slug: "breakfast".to_string(),
            color: None,
        };

        let new_tag = form.into_new_tag().expect("valid form");

        assert_eq!(new_tag.color, DEFAULT_TAG_COLOR);
    }

    #[test]
    fn add_tag_form_rejects_bad_slug_and_color() {
        let bad_slug = AddTagForm {
            name: "Dinner".to_string(),
            slug: "late dinner".to_string(),
            color: None,
        };
        assert!(matches!(
            bad_slug.into_new_tag(),
            Err(TagFormError::InvalidSlug)
        ));

        let bad_color = AddTagForm {
            name: "Dinner".to_string(),
            slug: "dinner".to_string(),
            color: Some("red".to_string()),
        };
        assert!(matches!(
            bad_color.into_new_tag(),
            Err(TagFormError::InvalidColor)
        ));
    }

    #[test]
    fn add_tag_form_rejects_empty_name() {
        let form = AddTagForm {
            name: "\u{7}".to_string(),
            slug: "bell".to_string(),
            color: None,
        };

        assert!(matches!(form.into_new_tag(), Err(TagFormError::EmptyName)));
    }
}
