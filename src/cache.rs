//! Process-wide registry of repositories, keyed by slug.
//!
//! The cache is the only shared mutable structure in the core. Its
//! correctness obligation is at-most-one in-flight catalog load per slug:
//! concurrent requests for one uncached slug share a single fetch and end up
//! holding the same `Arc<Repository>`. That is provided by keeping one
//! `tokio::sync::OnceCell` per slug and running construction through
//! `get_or_try_init` - a failed construction leaves the cell empty, so
//! nothing is cached and a later call retries from scratch.

use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

use crate::catalog::RemoteCatalog;
use crate::config::ConfigStore;
use crate::error::{Error, Result};
use crate::repository::Repository;

type RepoCell = Arc<OnceCell<Arc<Repository>>>;

pub struct RepositoryCache {
    store: Arc<dyn ConfigStore>,
    catalog: Arc<dyn RemoteCatalog>,
    repos: Mutex<HashMap<String, RepoCell>>,
}

impl RepositoryCache {
    pub fn new(store: Arc<dyn ConfigStore>, catalog: Arc<dyn RemoteCatalog>) -> Self {
        Self {
            store,
            catalog,
            repos: Mutex::new(HashMap::new()),
        }
    }

    /// Return the repository for `slug`, constructing and loading it on
    /// first reference.
    ///
    /// `Ok(None)` means the slug is not present in the durable record -
    /// "repository unknown", distinct from a transient failure. A load
    /// failure is returned as an error and leaves nothing cached.
    #[tracing::instrument(skip(self))]
    pub async fn get_or_construct(&self, slug: &str) -> Result<Option<Arc<Repository>>> {
        let cell = self.cell_for(slug);

        if let Some(repo) = cell.get() {
            return Ok(Some(Arc::clone(repo)));
        }

        let result = cell
            .get_or_try_init(|| self.construct(slug))
            .await
            .map(Arc::clone);

        match result {
            Ok(repo) => Ok(Some(repo)),
            Err(Error::RepositoryNotFound { .. }) => {
                warn!("Requested repository {} does not exist", slug);
                self.evict_if_unused(slug, &cell);
                Ok(None)
            }
            // A failed load leaves the cell empty, so a later call for this
            // slug retries from scratch. The cell must stay in the map: a
            // queued waiter may be running its own retry in it right now,
            // and evicting would orphan that waiter's successful load.
            Err(e) => Err(e),
        }
    }

    /// Every repository named by the durable record, in insertion order,
    /// constructing and loading any not yet cached.
    pub async fn list_all(&self) -> Result<Vec<Arc<Repository>>> {
        let entries = self.store.get_all().await.map_err(Error::Store)?;

        let mut repos = Vec::with_capacity(entries.len());
        for entry in entries {
            // The slug came from the record itself, so None can only mean a
            // concurrent removal from the store; skip it rather than fail
            // the whole listing.
            if let Some(repo) = self.get_or_construct(&entry.slug).await? {
                repos.push(repo);
            }
        }
        Ok(repos)
    }

    /// Durably record a new slug -> url mapping and return the slug.
    ///
    /// Does not construct or load the repository; the first read does that.
    #[tracing::instrument(skip(self))]
    pub async fn add(&self, slug: &str, url: &str) -> Result<String> {
        if slug.is_empty() {
            return Err(Error::InvalidInput("slug is missing".to_string()));
        }
        if url.is_empty() {
            return Err(Error::InvalidInput("url is missing".to_string()));
        }

        if self.store.get(slug).await.map_err(Error::Store)?.is_some() {
            return Err(Error::RepositoryExists {
                slug: slug.to_string(),
            });
        }

        self.store.set(slug, url).await.map_err(Error::Store)?;
        info!("Repository {} added url={}", slug, url);

        Ok(slug.to_string())
    }

    /// The per-slug init cell, created on first reference.
    fn cell_for(&self, slug: &str) -> RepoCell {
        let mut repos = self.repos.lock().unwrap();
        Arc::clone(repos.entry(slug.to_string()).or_default())
    }

    async fn construct(&self, slug: &str) -> Result<Arc<Repository>> {
        let url = self
            .store
            .get(slug)
            .await
            .map_err(Error::Store)?
            .ok_or_else(|| Error::RepositoryNotFound {
                slug: slug.to_string(),
            })?;

        let repo = Repository::load(slug, &url, self.catalog.as_ref()).await?;
        Ok(Arc::new(repo))
    }

    /// Drop a slug's cell after an unknown-slug miss, so probes for slugs
    /// that were never added do not accumulate map entries.
    ///
    /// Removal only happens when the map's reference and the caller's own
    /// clone are the last two holders: any other holder is a concurrent
    /// caller whose in-flight construction (legal after an interleaved
    /// `add`) must stay reachable from the map.
    fn evict_if_unused(&self, slug: &str, cell: &RepoCell) {
        let mut repos = self.repos.lock().unwrap();
        if let Some(current) = repos.get(slug)
            && Arc::ptr_eq(current, cell)
            && current.get().is_none()
            && Arc::strong_count(current) == 2
        {
            repos.remove(slug);
        }
    }
}
