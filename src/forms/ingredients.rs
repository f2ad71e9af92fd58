use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::Trim;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::ingredient::NewIngredient;
use crate::forms::sanitize_inline_text;

const NAME_MAX_LEN: u64 = 200;
const UNIT_MAX_LEN: u64 = 200;

/// Result type returned by the ingredient form helpers.
pub type IngredientFormResult<T> = Result<T, IngredientFormError>;

/// Errors that can occur while processing ingredient forms.
#[derive(Debug, Error)]
pub enum IngredientFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("ingredient name and measurement unit cannot be empty")]
    EmptyField,
}

/// Payload of the staff-only "create ingredient" endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct AddIngredientForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(min = 1, max = UNIT_MAX_LEN))]
    pub measurement_unit: String,
}

impl AddIngredientForm {
    /// Validates and sanitizes the payload into a domain `NewIngredient`.
    pub fn into_new_ingredient(self) -> IngredientFormResult<NewIngredient> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        let measurement_unit = sanitize_inline_text(&self.measurement_unit);
        if name.is_empty() || measurement_unit.is_empty() {
            return Err(IngredientFormError::EmptyField);
        }

        Ok(NewIngredient::new(name, measurement_unit))
    }
}

#[derive(MultipartForm)]
/// Multipart form for uploading a CSV file with new ingredients.
pub struct UploadIngredientsForm {
    #[multipart(limit = "10MB")]
    /// Uploaded CSV file with a `name,measurement_unit` header.
    pub csv: TempFile,
}

#[derive(Debug, Error)]
/// Errors that can occur while parsing an uploaded ingredients CSV file.
pub enum UploadIngredientsFormError {
    #[error("Error reading csv file")]
    FileReadError,
    #[error("Error parsing csv file: {0}")]
    CsvParseError(String),
}

impl From<std::io::Error> for UploadIngredientsFormError {
    fn from(_: std::io::Error) -> Self {
        UploadIngredientsFormError::FileReadError
    }
}

impl From<csv::Error> for UploadIngredientsFormError {
    fn from(err: csv::Error) -> Self {
        UploadIngredientsFormError::CsvParseError(err.to_string())
    }
}

impl UploadIngredientsForm {
    /// Parse the uploaded CSV file into a list of [`NewIngredient`] records.
    pub fn into_new_ingredients(
        &mut self,
    ) -> Result<Vec<NewIngredient>, UploadIngredientsFormError> {
        self.csv.file.rewind()?;
        parse_ingredients(self.csv.file.by_ref())
    }
}

#[derive(Deserialize)]
struct IngredientCsvRow {
    name: String,
    measurement_unit: String,
}

/// Rows with an empty name or unit are skipped.
pub(crate) fn parse_ingredients<R: Read>(
    reader: R,
) -> Result<Vec<NewIngredient>, UploadIngredientsFormError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);

    let mut ingredients = Vec::new();

    for row in csv_reader.deserialize::<IngredientCsvRow>() {
        let record = row?;

        let name = sanitize_inline_text(&record.name);
        let measurement_unit = sanitize_inline_text(&record.measurement_unit);
        if name.is_empty() || measurement_unit.is_empty() {
            continue;
        }

        ingredients.push(NewIngredient::new(name, measurement_unit));
    }

    Ok(ingredients)
}
