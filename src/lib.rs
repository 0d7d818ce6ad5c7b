//! Resolution and installation core for language package repositories.
//!
//! A durable slug -> URL map names remote repositories. Each repository's
//! package catalog is fetched lazily, exactly once per process, with
//! concurrent first reads sharing a single in-flight load. Packages are
//! selected by language plus a semantic-version constraint, and installation
//! is delegated to an opaque collaborator.
//!
//! Transport (HTTP routing, request validation, response shaping) is out of
//! scope: [`service::RepoService`] is the boundary a transport layer calls
//! into, and [`error::Error::category`] gives it a stable mapping to status
//! codes.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod install;
pub mod package;
pub mod repository;
pub mod service;
