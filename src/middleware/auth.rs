use axum::{
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    extract::Request,
    body::Body,
};
use tower_sessions::Session;
use crate::models::AuthUser;
use crate::services::web_session::AUTH_KEY;

pub async fn require_auth(
    session: Session,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();

    if path == "/" || path == "/login" || path == "/logout" || path.starts_with("/static/") {
        return next.run(req).await;
    }

    match session.get::<AuthUser>(AUTH_KEY).await {
        Ok(Some(_)) => next.run(req).await,
        Ok(None) => {
            tracing::debug!("Anonymous request for {} sent to login", path);
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::error!("Session lookup failed for {}: {}", path, e);
            Redirect::to("/").into_response()
        }
    }
}
