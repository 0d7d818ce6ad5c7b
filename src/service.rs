//! Transport-agnostic service facade.
//!
//! One method per exposed operation, mirroring what a transport layer would
//! route to. Results are plain serializable DTOs plus the typed errors of
//! [`crate::error`]; shaping them into responses and status codes is the
//! transport's job.

use log::debug;
use serde::Serialize;
use std::sync::Arc;

use crate::cache::RepositoryCache;
use crate::catalog::RemoteCatalog;
use crate::config::ConfigStore;
use crate::error::{Error, Result};
use crate::install::{Installer, run_install};
use crate::package::{Package, VersionConstraint};
use crate::repository::Repository;

/// One-line repository view: slug, origin URL, loaded package count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositorySummary {
    pub slug: String,
    pub url: String,
    pub packages: usize,
}

/// Package listing row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageSummary {
    pub language: String,
    pub language_version: String,
    pub installed: bool,
}

/// Full package metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageDetail {
    pub language: String,
    pub language_version: String,
    pub author: String,
    pub buildfile: String,
    pub size: u64,
    pub dependencies: Vec<String>,
    pub installed: bool,
}

pub struct RepoService {
    cache: RepositoryCache,
    installer: Arc<dyn Installer>,
}

impl RepoService {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        catalog: Arc<dyn RemoteCatalog>,
        installer: Arc<dyn Installer>,
    ) -> Self {
        Self {
            cache: RepositoryCache::new(store, catalog),
            installer,
        }
    }

    /// Register a new repository. Lazy: no catalog fetch happens here.
    pub async fn add_repository(&self, slug: &str, url: &str) -> Result<String> {
        debug!("Request for repository add slug={} url={}", slug, url);
        self.cache.add(slug, url).await
    }

    /// Summaries for every registered repository, in registration order.
    pub async fn list_repositories(&self) -> Result<Vec<RepositorySummary>> {
        debug!("Request for repository list");
        let repos = self.cache.list_all().await?;
        Ok(repos.iter().map(|r| summarize(r)).collect())
    }

    /// Summary of one repository.
    pub async fn repository_info(&self, slug: &str) -> Result<RepositorySummary> {
        debug!("Request for repository info slug={}", slug);
        let repo = self.require_repo(slug).await?;
        Ok(summarize(&repo))
    }

    /// Package listing for one repository, triggering its lazy load.
    pub async fn list_packages(&self, slug: &str) -> Result<Vec<PackageSummary>> {
        debug!("Request for package list slug={}", slug);
        let repo = self.require_repo(slug).await?;
        Ok(repo
            .packages()
            .iter()
            .map(|pkg| PackageSummary {
                language: pkg.language.clone(),
                language_version: pkg.raw_version.clone(),
                installed: pkg.installed(),
            })
            .collect())
    }

    /// Full metadata for the best package matching language + constraint.
    pub async fn package_info(
        &self,
        slug: &str,
        language: &str,
        constraint: &str,
    ) -> Result<PackageDetail> {
        debug!(
            "Request for package info slug={} language={} constraint={}",
            slug, language, constraint
        );
        let repo = self.require_repo(slug).await?;
        let pkg = find_package(&repo, language, constraint)?;
        Ok(PackageDetail {
            language: pkg.language.clone(),
            language_version: pkg.raw_version.clone(),
            author: pkg.author.clone(),
            buildfile: pkg.buildfile.clone(),
            size: pkg.size,
            dependencies: pkg.dependencies.clone(),
            installed: pkg.installed(),
        })
    }

    /// Resolve and install the best package matching language + constraint.
    /// Returns the install collaborator's payload verbatim.
    pub async fn install_package(
        &self,
        slug: &str,
        language: &str,
        constraint: &str,
    ) -> Result<serde_json::Value> {
        debug!(
            "Request for package install slug={} language={} constraint={}",
            slug, language, constraint
        );
        let repo = self.require_repo(slug).await?;
        let pkg = find_package(&repo, language, constraint)?;
        run_install(self.installer.as_ref(), pkg).await
    }

    async fn require_repo(&self, slug: &str) -> Result<Arc<Repository>> {
        self.cache
            .get_or_construct(slug)
            .await?
            .ok_or_else(|| Error::RepositoryNotFound {
                slug: slug.to_string(),
            })
    }
}

fn summarize(repo: &Repository) -> RepositorySummary {
    RepositorySummary {
        slug: repo.slug().to_string(),
        url: repo.url().to_string(),
        packages: repo.packages().len(),
    }
}

fn find_package<'a>(
    repo: &'a Repository,
    language: &str,
    constraint: &str,
) -> Result<&'a Package> {
    let parsed: VersionConstraint = constraint.parse().map_err(|e| {
        Error::InvalidInput(format!("invalid version constraint {}: {}", constraint, e))
    })?;

    repo.find(language, &parsed)
        .ok_or_else(|| Error::PackageNotFound {
            language: language.to_string(),
            constraint: constraint.to_string(),
        })
}
