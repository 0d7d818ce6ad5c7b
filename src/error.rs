//! Failure taxonomy for the resolution and installation core.
//!
//! Every operation exposed by the service facade yields either a success
//! payload or one of these errors. Each error carries a stable [`Category`]
//! so a transport layer can map it to a status code without parsing
//! message text.

use thiserror::Error;

/// Coarse failure category, stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Unknown slug or no package matching a language + constraint.
    /// Expected and frequent, not exceptional.
    NotFound,
    /// Duplicate repository registration.
    AlreadyExists,
    /// Missing or malformed request fields.
    InvalidInput,
    /// Remote catalog fetch failed. Nothing is cached; a later call retries.
    LoadFailure,
    /// The install collaborator failed. Package state is unaffected.
    InstallationFailure,
    /// Durable store I/O failure.
    Internal,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("repository {slug} does not exist")]
    RepositoryNotFound { slug: String },

    #[error("package {language}-{constraint} does not exist")]
    PackageNotFound { language: String, constraint: String },

    #[error("repository {slug} already exists")]
    RepositoryExists { slug: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to load catalog for repository {slug}")]
    LoadFailure {
        slug: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to install package {language}-{version}: {message}")]
    InstallationFailure {
        language: String,
        version: String,
        message: String,
    },

    #[error("configuration store failure")]
    Store(#[source] anyhow::Error),
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Error::RepositoryNotFound { .. } | Error::PackageNotFound { .. } => Category::NotFound,
            Error::RepositoryExists { .. } => Category::AlreadyExists,
            Error::InvalidInput(_) => Category::InvalidInput,
            Error::LoadFailure { .. } => Category::LoadFailure,
            Error::InstallationFailure { .. } => Category::InstallationFailure,
            Error::Store(_) => Category::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
