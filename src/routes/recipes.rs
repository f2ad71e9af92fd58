use actix_web::http::header::ContentDisposition;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};
use futures::stream;

use crate::auth::AuthenticatedUser;
use crate::forms::recipes::RecipeForm;
use crate::repository::DieselRepository;
use crate::routes::{ErrorBody, service_error};
use crate::services::favorites::{add_favorite, remove_favorite};
use crate::services::recipes::{
    RecipeQuery, create_recipe, load_recipe, load_recipes, modify_recipe, remove_recipe,
};
use crate::services::shopping_cart::{
    EXPORT_FILE_NAME, add_to_cart, encode_row, load_shopping_list, remove_from_cart,
};

#[get("/recipes")]
/// Recipe list. Parsed with `serde_html_form` so `tags` may repeat.
pub async fn list_recipes(
    req: HttpRequest,
    viewer: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match serde_html_form::from_str::<RecipeQuery>(req.query_string()) {
        Ok(query) => query,
        Err(err) => return HttpResponse::BadRequest().json(ErrorBody::new(err.to_string())),
    };

    match load_recipes(repo.get_ref(), viewer.as_ref(), query) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => service_error(err, "Failed to list recipes"),
    }
}

#[post("/recipes")]
pub async fn add_recipe(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<RecipeForm>,
) -> impl Responder {
    match create_recipe(repo.get_ref(), &user, form.into_inner()) {
        Ok(recipe) => HttpResponse::Created().json(recipe),
        Err(err) => service_error(err, "Failed to create recipe"),
    }
}

#[get("/recipes/download_shopping_cart")]
/// Stream the summed ingredients of the cart as CSV, one record per
/// ingredient and unit.
pub async fn download_shopping_cart(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let list = match load_shopping_list(repo.get_ref(), &user) {
        Ok(list) => list,
        Err(err) => return service_error(err, "Failed to build shopping list"),
    };

    let rows = list
        .into_rows()
        .map(|row| encode_row(&row).map(web::Bytes::from));

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition::attachment(EXPORT_FILE_NAME))
        .streaming(stream::iter(rows))
}

#[get("/recipes/{recipe_id:\\d+}")]
pub async fn show_recipe(
    recipe_id: web::Path<i32>,
    viewer: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_recipe(repo.get_ref(), viewer.as_ref(), recipe_id.into_inner()) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => service_error(err, "Failed to load recipe"),
    }
}

#[put("/recipes/{recipe_id:\\d+}")]
pub async fn update_recipe(
    recipe_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<RecipeForm>,
) -> impl Responder {
    match modify_recipe(repo.get_ref(), &user, recipe_id.into_inner(), form.into_inner()) {
        Ok(recipe) => HttpResponse::Ok().json(recipe),
        Err(err) => service_error(err, "Failed to update recipe"),
    }
}

#[delete("/recipes/{recipe_id:\\d+}")]
pub async fn delete_recipe(
    recipe_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_recipe(repo.get_ref(), &user, recipe_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error(err, "Failed to delete recipe"),
    }
}

#[get("/recipes/{recipe_id:\\d+}/favorite")]
pub async fn favorite_recipe(
    recipe_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match add_favorite(repo.get_ref(), &user, recipe_id.into_inner()) {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(err) => service_error(err, "Failed to add favorite"),
    }
}

#[delete("/recipes/{recipe_id:\\d+}/favorite")]
pub async fn unfavorite_recipe(
    recipe_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_favorite(repo.get_ref(), &user, recipe_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error(err, "Failed to remove favorite"),
    }
}

#[get("/recipes/{recipe_id:\\d+}/shopping_cart")]
pub async fn add_recipe_to_cart(
    recipe_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match add_to_cart(repo.get_ref(), &user, recipe_id.into_inner()) {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(err) => service_error(err, "Failed to add recipe to cart"),
    }
}

#[delete("/recipes/{recipe_id:\\d+}/shopping_cart")]
pub async fn remove_recipe_from_cart(
    recipe_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_from_cart(repo.get_ref(), &user, recipe_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error(err, "Failed to remove recipe from cart"),
    }
}
