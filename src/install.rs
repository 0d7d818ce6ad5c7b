//! Installation orchestration.
//!
//! The actual network fetch and filesystem materialization live behind the
//! [`Installer`] trait; this module decides what happens around the call:
//! per-package serialization, the installed-flag transition, and failure
//! surfacing. The core never retries - retry policy belongs to callers.

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};

use crate::error::Error;
use crate::package::Package;

/// Install collaborator: materializes a package's buildfile and
/// dependencies. Opaque to the core; its success payload is passed back to
/// the caller verbatim.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, package: &Package) -> Result<serde_json::Value>;
}

/// Run the installer for a resolved package.
///
/// Installs of one package are serialized through its install gate. On
/// success the package is marked installed and the collaborator's payload is
/// returned verbatim; on failure the installed flag is untouched and the
/// collaborator's message surfaces as [`Error::InstallationFailure`].
#[tracing::instrument(skip(installer, package), fields(language = %package.language, version = %package.raw_version))]
pub async fn run_install(
    installer: &dyn Installer,
    package: &Package,
) -> std::result::Result<serde_json::Value, Error> {
    let _gate = package.install_gate().lock().await;

    match installer.install(package).await {
        Ok(payload) => {
            package.mark_installed();
            info!(
                "Installed package {}-{}",
                package.language, package.raw_version
            );
            Ok(payload)
        }
        Err(e) => {
            error!(
                "Error while installing package {}-{}: {}",
                package.language, package.raw_version, e
            );
            Err(Error::InstallationFailure {
                language: package.language.clone(),
                version: package.raw_version.clone(),
                message: e.to_string(),
            })
        }
    }
}
