//! End-to-end test over the real collaborator implementations: a JSON file
//! config store, an HTTP catalog served by mockito, and a scripted installer.

use anyhow::Result;
use async_trait::async_trait;
use mockito::Server;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

use repokit::catalog::HttpCatalog;
use repokit::config::JsonFileStore;
use repokit::error::Category;
use repokit::install::Installer;
use repokit::package::Package;
use repokit::service::RepoService;

/// Installer that succeeds for everything except node, echoing the package
/// identity back as its payload.
struct ScriptedInstaller;

#[async_trait]
impl Installer for ScriptedInstaller {
    async fn install(&self, package: &Package) -> Result<serde_json::Value> {
        if package.language == "node" {
            anyhow::bail!("buildfile rejected");
        }
        Ok(json!({
            "language": package.language,
            "version": package.raw_version,
            "buildfile": package.buildfile,
        }))
    }
}

fn index_body() -> &'static str {
    r#"[
        {"language": "python", "language_version": "3.11.0",
         "author": "psf", "buildfile": "python-3.11.0.pkg", "size": 100,
         "dependencies": []},
        {"language": "python", "language_version": "3.12.0",
         "author": "psf", "buildfile": "python-3.12.0.pkg", "size": 120,
         "dependencies": []},
        {"language": "node", "language_version": "18.4.0",
         "author": "nodesource", "buildfile": "node-18.4.0.pkg", "size": 200,
         "dependencies": ["openssl"]}
    ]"#
}

fn service_over(dir: &std::path::Path) -> RepoService {
    let store = JsonFileStore::new(dir.join("repositories.json"));
    RepoService::new(
        Arc::new(store),
        Arc::new(HttpCatalog::default()),
        Arc::new(ScriptedInstaller),
    )
}

#[tokio::test]
async fn test_end_to_end_resolve_and_install() {
    let mut server = Server::new_async().await;
    let mock_index = server
        .mock("GET", "/index")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(index_body())
        .expect(1)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let service = service_over(dir.path());

    // Register the repository; nothing is fetched yet.
    let slug = service
        .add_repository("main", &format!("{}/index", server.url()))
        .await
        .unwrap();
    assert_eq!(slug, "main");

    // First read triggers the lazy load.
    let packages = service.list_packages("main").await.unwrap();
    assert_eq!(packages.len(), 3);

    // Resolution picks the highest compatible version.
    let detail = service.package_info("main", "python", "^3.0.0").await.unwrap();
    assert_eq!(detail.language_version, "3.12.0");
    assert!(!detail.installed);

    // Install returns the collaborator's payload verbatim.
    let payload = service
        .install_package("main", "python", "^3.0.0")
        .await
        .unwrap();
    assert_eq!(payload["buildfile"], "python-3.12.0.pkg");

    let detail = service.package_info("main", "python", "^3.0.0").await.unwrap();
    assert!(detail.installed);

    // A rejected install surfaces the collaborator's message and leaves the
    // flag untouched.
    let err = service
        .install_package("main", "node", "*")
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::InstallationFailure);
    assert!(err.to_string().contains("buildfile rejected"));
    let detail = service.package_info("main", "node", "*").await.unwrap();
    assert!(!detail.installed);

    // Every read above shared the single catalog fetch.
    let repos = service.list_repositories().await.unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].packages, 3);
    mock_index.assert_async().await;
}

#[tokio::test]
async fn test_config_survives_service_restart() {
    let mut server = Server::new_async().await;
    let _mock_index = server
        .mock("GET", "/index")
        .with_status(200)
        .with_body(index_body())
        .expect(1)
        .create_async()
        .await;

    let dir = tempdir().unwrap();

    {
        let service = service_over(dir.path());
        service
            .add_repository("main", &format!("{}/index", server.url()))
            .await
            .unwrap();
    }

    // A fresh service over the same store file still knows the repository.
    let service = service_over(dir.path());
    let info = service.repository_info("main").await.unwrap();
    assert_eq!(info.slug, "main");
    assert_eq!(info.packages, 3);

    // Duplicate registration is rejected durably, not just in memory.
    let err = service
        .add_repository("main", "http://elsewhere")
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::AlreadyExists);
}

#[tokio::test]
async fn test_unreachable_catalog_is_retryable() {
    let mut server = Server::new_async().await;
    let mock_down = server
        .mock("GET", "/index")
        .with_status(502)
        .expect(1)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let service = service_over(dir.path());
    service
        .add_repository("main", &format!("{}/index", server.url()))
        .await
        .unwrap();

    let err = service.list_packages("main").await.unwrap_err();
    assert_eq!(err.category(), Category::LoadFailure);
    mock_down.assert_async().await;

    // The failed load cached nothing; once the origin recovers, the same
    // slug loads fine.
    let mock_up = server
        .mock("GET", "/index")
        .with_status(200)
        .with_body(index_body())
        .expect(1)
        .create_async()
        .await;

    let packages = service.list_packages("main").await.unwrap();
    assert_eq!(packages.len(), 3);
    mock_up.assert_async().await;
}
