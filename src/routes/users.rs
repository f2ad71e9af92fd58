use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::forms::users::{RegisterUserForm, SetPasswordForm};
use crate::pagination::PageQuery;
use crate::repository::DieselRepository;
use crate::routes::service_error;
use crate::services::subscriptions::{
    SubscriptionQuery, load_subscriptions, subscribe, unsubscribe,
};
use crate::services::users::{
    change_password, current_user, load_user, load_users, register_user,
};

#[get("/users")]
pub async fn list_users(
    params: web::Query<PageQuery>,
    viewer: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_users(repo.get_ref(), viewer.as_ref(), &params) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => service_error(err, "Failed to list users"),
    }
}

#[post("/users")]
pub async fn create_user(
    repo: web::Data<DieselRepository>,
    form: web::Json<RegisterUserForm>,
) -> impl Responder {
    match register_user(repo.get_ref(), form.into_inner()) {
        Ok(user) => HttpResponse::Created().json(user),
        Err(err) => service_error(err, "Failed to register user"),
    }
}

#[get("/users/me")]
pub async fn show_me(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    match current_user(repo.get_ref(), &user) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error(err, "Failed to load current user"),
    }
}

#[post("/users/set_password")]
pub async fn set_password(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<SetPasswordForm>,
) -> impl Responder {
    match change_password(repo.get_ref(), &user, form.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error(err, "Failed to change password"),
    }
}

#[get("/users/subscriptions")]
/// Authors followed by the current user, each with a preview of their recipes.
pub async fn list_subscriptions(
    params: web::Query<SubscriptionQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_subscriptions(repo.get_ref(), &user, &params) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => service_error(err, "Failed to list subscriptions"),
    }
}

#[get("/users/{user_id:\\d+}")]
pub async fn show_user(
    user_id: web::Path<i32>,
    viewer: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_user(repo.get_ref(), viewer.as_ref(), user_id.into_inner()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error(err, "Failed to load user"),
    }
}

#[get("/users/{user_id:\\d+}/subscribe")]
pub async fn follow_author(
    user_id: web::Path<i32>,
    params: web::Query<SubscriptionQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match subscribe(repo.get_ref(), &user, user_id.into_inner(), &params) {
        Ok(author) => HttpResponse::Created().json(author),
        Err(err) => service_error(err, "Failed to subscribe"),
    }
}

#[delete("/users/{user_id:\\d+}/subscribe")]
pub async fn unfollow_author(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match unsubscribe(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error(err, "Failed to unsubscribe"),
    }
}
