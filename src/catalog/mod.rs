//! Remote package catalog abstraction.
//!
//! A catalog is the package index one repository serves at its origin URL.
//! The core treats fetching it as an opaque effectful operation; the HTTP
//! implementation lives in [`http`].

mod http;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpCatalog;

/// One installable unit as described by a remote package index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PackageDescriptor {
    /// Target language/runtime identifier (e.g. "python").
    pub language: String,
    /// Raw version string as published by the index.
    pub language_version: String,
    #[serde(default)]
    pub author: String,
    /// Opaque build descriptor consumed by the install collaborator.
    #[serde(default)]
    pub buildfile: String,
    #[serde(default)]
    pub size: u64,
    /// Opaque dependency references. Not resolved by this core.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Fetches the package catalog published at a repository's origin URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<PackageDescriptor>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_deserializes_with_defaults() {
        let json = r#"{"language": "python", "language_version": "3.12.0"}"#;
        let desc: PackageDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(desc.language, "python");
        assert_eq!(desc.language_version, "3.12.0");
        assert_eq!(desc.author, "");
        assert_eq!(desc.buildfile, "");
        assert_eq!(desc.size, 0);
        assert!(desc.dependencies.is_empty());
    }

    #[test]
    fn test_descriptor_full_roundtrip() {
        let json = r#"{
            "language": "node",
            "language_version": "18.1.0",
            "author": "nodesource",
            "buildfile": "https://example.com/node-18.1.0.pkg",
            "size": 44040192,
            "dependencies": ["openssl"]
        }"#;
        let desc: PackageDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(desc.author, "nodesource");
        assert_eq!(desc.size, 44_040_192);
        assert_eq!(desc.dependencies, vec!["openssl"]);
    }
}
