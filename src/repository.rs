//! One remote package source and its loaded catalog.

use log::{debug, warn};

use crate::catalog::RemoteCatalog;
use crate::error::Error;
use crate::package::{Package, VersionConstraint, VersionResolver};

/// A repository whose catalog has been fetched from its origin URL.
///
/// Constructed only through [`Repository::load`], so a `Repository` value is
/// always fully populated: readers never observe a partial catalog. After
/// load the package list is read-only except for each package's installed
/// flag.
#[derive(Debug)]
pub struct Repository {
    slug: String,
    url: String,
    packages: Vec<Package>,
}

impl Repository {
    /// Fetch the catalog at `url` and construct the repository.
    ///
    /// Descriptors whose version does not parse as semver are skipped with a
    /// warning; the index is external input and one bad entry should not
    /// poison the whole catalog. A failed fetch is fatal to this
    /// construction attempt and surfaces as [`Error::LoadFailure`].
    #[tracing::instrument(skip(catalog))]
    pub async fn load(
        slug: &str,
        url: &str,
        catalog: &dyn RemoteCatalog,
    ) -> Result<Self, Error> {
        let descriptors = catalog.fetch(url).await.map_err(|source| Error::LoadFailure {
            slug: slug.to_string(),
            source,
        })?;

        let mut packages = Vec::with_capacity(descriptors.len());
        for desc in descriptors {
            let language = desc.language.clone();
            let raw_version = desc.language_version.clone();
            match Package::from_descriptor(desc) {
                Ok(pkg) => packages.push(pkg),
                Err(e) => warn!(
                    "Skipping package {}-{} from repository {}: unparseable version: {}",
                    language, raw_version, slug, e
                ),
            }
        }

        debug!("Loaded {} packages for repository {}", packages.len(), slug);

        Ok(Self {
            slug: slug.to_string(),
            url: url.to_string(),
            packages,
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Best package for a language under a version constraint, or `None`.
    pub fn find(&self, language: &str, constraint: &VersionConstraint) -> Option<&Package> {
        VersionResolver::best_match(&self.packages, language, constraint)
    }
}
