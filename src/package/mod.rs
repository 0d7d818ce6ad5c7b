//! Package model and version resolution.

mod resolver;

use semver::Version;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::catalog::PackageDescriptor;

pub use resolver::{VersionConstraint, VersionResolver};

/// One installable package inside a loaded repository.
///
/// Identity fields are immutable after load; the installed flag is the only
/// state that changes afterwards, and installs for one package are serialized
/// through [`Package::install_gate`].
#[derive(Debug)]
pub struct Package {
    pub language: String,
    /// Parsed version, used for constraint matching and ordering.
    pub version: Version,
    /// Version string exactly as the index published it.
    pub raw_version: String,
    pub author: String,
    pub buildfile: String,
    pub size: u64,
    pub dependencies: Vec<String>,
    installed: AtomicBool,
    install_gate: Mutex<()>,
}

impl Package {
    /// Build a package from its wire descriptor.
    ///
    /// Tolerates a leading `v` on the version string; anything that still
    /// fails to parse as semver is rejected and the caller decides whether
    /// to skip it.
    pub fn from_descriptor(desc: PackageDescriptor) -> Result<Self, semver::Error> {
        let normalized = desc
            .language_version
            .strip_prefix('v')
            .unwrap_or(&desc.language_version);
        let version = Version::parse(normalized)?;

        Ok(Self {
            language: desc.language,
            version,
            raw_version: desc.language_version,
            author: desc.author,
            buildfile: desc.buildfile,
            size: desc.size,
            dependencies: desc.dependencies,
            installed: AtomicBool::new(false),
            install_gate: Mutex::new(()),
        })
    }

    pub fn installed(&self) -> bool {
        self.installed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_installed(&self) {
        self.installed.store(true, Ordering::Release);
    }

    /// Per-package mutex held across an install collaborator call, so two
    /// concurrent installs of the same package run one after the other.
    pub(crate) fn install_gate(&self) -> &Mutex<()> {
        &self.install_gate
    }
}
