//! Error types shared across the service.

use actix_web::http::StatusCode;
use sea_orm::DbErr;
use uuid::Uuid;

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Token verification errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to fetch JWKS: {0}")]
    JwksFetch(String),

    #[error("Key with kid={0} not found in JWKS")]
    UnknownKey(String),

    #[error("Malformed JWK: {0}")]
    MalformedKey(&'static str),

    #[error("Token has no 'kid' header and no shared secret is configured")]
    NoVerificationKey,

    #[error("Token validation failed: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid UUID in sub claim: {0}")]
    InvalidSubject(#[from] uuid::Error),
}

/// Failures reported by the portfolio store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Portfolio {0} not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Stored portfolio is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures while listing repositories from GitHub.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("GitHub handle not found. Please connect your GitHub account.")]
    MissingHandle,

    #[error("{0:?} is not a valid GitHub handle")]
    InvalidHandle(String),

    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub responded with HTTP {0}")]
    Status(u16),
}

/// Errors surfaced by wizard operations.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("No wizard session is open")]
    NoSession,

    #[error("A submit is already in progress")]
    SubmitInFlight,

    #[error("A repository import is already in progress")]
    ImportInFlight,

    #[error("The portfolio is still loading")]
    StillLoading,

    #[error("No portfolio was loaded for editing")]
    NothingLoaded,

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WizardError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoSession => StatusCode::NOT_FOUND,
            Self::SubmitInFlight | Self::ImportInFlight | Self::StillLoading => {
                StatusCode::CONFLICT
            }
            Self::NothingLoaded
            | Self::Import(ImportError::MissingHandle | ImportError::InvalidHandle(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Import(_) => StatusCode::BAD_GATEWAY,
            Self::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
