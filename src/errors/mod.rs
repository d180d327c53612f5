// Application-wide error type and result alias, built on thiserror.
use thiserror::Error;

pub mod response;
pub mod fixture;

pub use fixture::{FixtureError, FixtureResult};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    // Carries the screen path the visitor was refused.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),
}

pub type AppResult<T> = Result<T, AppError>;
