use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, post, web};

use crate::forms::users::LoginForm;
use crate::repository::DieselRepository;
use crate::routes::service_error;
use crate::services::ServiceError;
use crate::services::users::authenticate;

#[post("/auth/token/login")]
/// Check the credentials and store the user's claims in the session cookie.
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    form: web::Json<LoginForm>,
) -> impl Responder {
    let user = match authenticate(repo.get_ref(), form.into_inner()) {
        Ok(user) => user,
        Err(err) => return service_error(err, "Failed to log in"),
    };

    let claims = match user.to_identity() {
        Ok(claims) => claims,
        Err(err) => {
            return service_error(ServiceError::Internal(err.to_string()), "Failed to log in");
        }
    };

    match Identity::login(&req.extensions(), claims) {
        Ok(_) => HttpResponse::Ok().json(&user),
        Err(err) => service_error(ServiceError::Internal(err.to_string()), "Failed to log in"),
    }
}

#[post("/auth/token/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    HttpResponse::NoContent().finish()
}
