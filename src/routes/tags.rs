use actix_web::{HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::tags::AddTagForm;
use crate::pagination::PageQuery;
use crate::repository::DieselRepository;
use crate::routes::service_error;
use crate::services::tags::{create_tag, load_tag, load_tags};

#[get("/tags")]
pub async fn list_tags(
    params: web::Query<PageQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_tags(repo.get_ref(), &params) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => service_error(err, "Failed to list tags"),
    }
}

#[get("/tags/{tag_id:\\d+}")]
pub async fn show_tag(tag_id: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    match load_tag(repo.get_ref(), tag_id.into_inner()) {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(err) => service_error(err, "Failed to load tag"),
    }
}

#[post("/tags")]
pub async fn add_tag(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddTagForm>,
) -> impl Responder {
    match create_tag(repo.get_ref(), &user, form.into_inner()) {
        Ok(tag) => HttpResponse::Created().json(tag),
        Err(err) => service_error(err, "Failed to create tag"),
    }
}
