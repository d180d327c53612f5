use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed fixture file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Credential {0} references an unknown user")]
    DanglingCredential(String),
}

pub type FixtureResult<T> = Result<T, FixtureError>;
