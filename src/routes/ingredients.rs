use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::forms::ingredients::{AddIngredientForm, UploadIngredientsForm};
use crate::repository::DieselRepository;
use crate::routes::service_error;
use crate::services::ingredients::{
    IngredientQuery, create_ingredient, import_ingredients, load_ingredient, load_ingredients,
};

#[derive(Serialize)]
struct ImportSummary {
    imported: usize,
}

#[get("/ingredients")]
pub async fn list_ingredients(
    params: web::Query<IngredientQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_ingredients(repo.get_ref(), params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => service_error(err, "Failed to list ingredients"),
    }
}

#[get("/ingredients/{ingredient_id:\\d+}")]
pub async fn show_ingredient(
    ingredient_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_ingredient(repo.get_ref(), ingredient_id.into_inner()) {
        Ok(ingredient) => HttpResponse::Ok().json(ingredient),
        Err(err) => service_error(err, "Failed to load ingredient"),
    }
}

#[post("/ingredients")]
pub async fn add_ingredient(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddIngredientForm>,
) -> impl Responder {
    match create_ingredient(repo.get_ref(), &user, form.into_inner()) {
        Ok(ingredient) => HttpResponse::Created().json(ingredient),
        Err(err) => service_error(err, "Failed to create ingredient"),
    }
}

#[post("/ingredients/upload")]
/// Bulk import from a multipart CSV file with a `name,measurement_unit` header.
pub async fn upload_ingredients(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadIngredientsForm>,
) -> impl Responder {
    match import_ingredients(repo.get_ref(), &user, form) {
        Ok(imported) => HttpResponse::Created().json(ImportSummary { imported }),
        Err(err) => service_error(err, "Failed to import ingredients"),
    }
}
