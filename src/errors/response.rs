use axum::{
    response::{IntoResponse, Response, Redirect},
    http::StatusCode,
};
use urlencoding;
use crate::errors::AppError;

// Converts AppError into the response the visitor sees.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authentication errors redirect to login
            AppError::Auth(msg) => {
                Redirect::to(&format!("/?error={}", urlencoding::encode(&msg)))
                    .into_response()
            }

            // Screens outside the role's menu bounce back to the dashboard
            AppError::Forbidden(path) => {
                let notice = format!("You do not have access to {}", path);
                Redirect::to(&format!("/dashboard?notice={}", urlencoding::encode(&notice)))
                    .into_response()
            }

            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                format!("Not found: {}", what)
            ).into_response(),

            AppError::Session(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Session error: {}", e)
            ).into_response(),

            AppError::File(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("File error: {}", e)
            ).into_response(),

            // Startup-only failures; reaching a handler with one is a bug
            AppError::Fixture(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {}", self)
            ).into_response(),
        }
    }
}
