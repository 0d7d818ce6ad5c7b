//! Version resolution for packages.
//!
//! Deterministic selection of the best package version satisfying a
//! constraint, over a repository's loaded candidate set.

use semver::{Version, VersionReq};
use std::fmt;
use std::str::FromStr;

use super::Package;

/// A semantic-version range expression, possibly a `||` union of ranges.
///
/// Each alternative uses the standard comparator grammar
/// (`=, <, <=, >, >=, ~, ^`, wildcards, comma-separated conjunctions);
/// the union matches when any alternative matches. Per standard semver
/// matching, prerelease versions only match alternatives that themselves
/// name a prerelease.
#[derive(Debug, Clone)]
pub struct VersionConstraint {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl VersionConstraint {
    /// The constraint exactly as the caller wrote it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl FromStr for VersionConstraint {
    type Err = semver::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alternatives = s
            .split("||")
            .map(|part| VersionReq::parse(part.trim()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: s.to_string(),
            alternatives,
        })
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Version resolver - pure functions for version resolution.
///
/// All methods are stateless and operate on slices of packages.
pub struct VersionResolver;

impl VersionResolver {
    /// Select the best package for a language under a constraint.
    ///
    /// Candidates are filtered to an exact language match and constraint
    /// satisfaction, then the maximum by semver precedence wins. When two
    /// candidates parse to the same version, the first one encountered is
    /// kept. Returns `None` when nothing satisfies the constraint.
    pub fn best_match<'a>(
        packages: &'a [Package],
        language: &str,
        constraint: &VersionConstraint,
    ) -> Option<&'a Package> {
        let mut best: Option<&Package> = None;
        for pkg in packages
            .iter()
            .filter(|p| p.language == language && constraint.matches(&p.version))
        {
            match best {
                Some(current) if pkg.version <= current.version => {}
                _ => best = Some(pkg),
            }
        }
        best
    }
}
