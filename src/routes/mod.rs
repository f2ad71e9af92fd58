use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, error, web};
use serde::Serialize;

use crate::services::ServiceError;

pub mod auth;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Form(_)
            | ServiceError::Duplicate(_)
            | ServiceError::NotAssociated(_)
            | ServiceError::SelfSubscription => StatusCode::BAD_REQUEST,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            ServiceError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody::new(detail))
    }
}

/// Render a service error, logging the ones that point at a server fault.
pub(crate) fn service_error(err: ServiceError, context: &str) -> HttpResponse {
    if let ServiceError::Internal(message) = &err {
        log::error!("{context}: {message}");
    }
    err.error_response()
}

/// Turns body and query deserialization failures into `{"detail": ...}` responses.
pub fn payload_error<E>(err: E, _req: &HttpRequest) -> error::Error
where
    E: std::fmt::Display,
{
    let response = HttpResponse::BadRequest().json(ErrorBody::new(err.to_string()));
    error::InternalError::from_response(err.to_string(), response).into()
}

/// Register every endpoint under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(payload_error))
        .app_data(web::QueryConfig::default().error_handler(payload_error))
        .service(
            web::scope("/api")
                .service(auth::login)
                .service(auth::logout)
                .service(recipes::list_recipes)
                .service(recipes::add_recipe)
                .service(recipes::download_shopping_cart)
                .service(recipes::show_recipe)
                .service(recipes::update_recipe)
                .service(recipes::delete_recipe)
                .service(recipes::favorite_recipe)
                .service(recipes::unfavorite_recipe)
                .service(recipes::add_recipe_to_cart)
                .service(recipes::remove_recipe_from_cart)
                .service(tags::list_tags)
                .service(tags::show_tag)
                .service(tags::add_tag)
                .service(ingredients::list_ingredients)
                .service(ingredients::show_ingredient)
                .service(ingredients::add_ingredient)
                .service(ingredients::upload_ingredients)
                .service(users::list_users)
                .service(users::create_user)
                .service(users::show_me)
                .service(users::set_password)
                .service(users::list_subscriptions)
                .service(users::show_user)
                .service(users::follow_author)
                .service(users::unfollow_author),
        );
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[actix_web::test]
    async fn service_errors_map_to_status_and_detail() {
        let cases = [
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden, StatusCode::FORBIDDEN),
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (ServiceError::SelfSubscription, StatusCode::BAD_REQUEST),
            (
                ServiceError::NotAssociated("Recipe is not in favorites".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.error_response().status(), status);
        }

        let response = ServiceError::Duplicate("Recipe is already in favorites".to_string())
            .error_response();
        let body = to_bytes(response.into_body()).await.expect("body");
        assert_eq!(
            body.as_ref(),
            br#"{"detail":"Recipe is already in favorites"}"#
        );
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let response =
            service_error(ServiceError::Internal("disk on fire".to_string()), "test");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.expect("body");
        assert_eq!(body.as_ref(), br#"{"detail":"Internal server error"}"#);
    }
}
