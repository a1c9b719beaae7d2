use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use auth::LoginError;
use common::AppError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpApiError {
    #[error("{0}")]
    App(#[from] AppError),
    #[error("{0}")]
    Login(#[from] LoginError),
}

impl ResponseError for HttpApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::App(AppError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::App(AppError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            Self::Login(LoginError::UserNotFound) => StatusCode::NOT_FOUND,
            Self::Login(LoginError::InvalidPassword) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::App(AppError::NotFound(resource)) => {
                json!({"error": format!("{} not found", resource.label())})
            }
            Self::App(AppError::BadRequest(msg)) => json!({"error": msg}),
            Self::Login(e) => json!({"success": false, "message": e.to_string()}),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Malformed or mistyped JSON bodies answer 400 `{error}`.
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = json!({"error": err.to_string()});
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}
