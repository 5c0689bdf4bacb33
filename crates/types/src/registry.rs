use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A supported package registry.
///
/// Each registry maps to one logical database on the data plane, named by
/// [`Registry::as_str`]. The set is fixed: collections for anything else
/// are not ingested and never appear in `versions.json`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Registry {
    Npm,
    PyPi,
    CratesIo,
    GolangProxy,
    GithubReleases,
    Terraform,
    RubyGems,
}

impl Registry {
    /// Every registry the pipeline knows about.
    pub const ALL: [Registry; 7] = [
        Registry::Npm,
        Registry::PyPi,
        Registry::CratesIo,
        Registry::GolangProxy,
        Registry::GithubReleases,
        Registry::Terraform,
        Registry::RubyGems,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Registry::Npm => "npm",
            Registry::PyPi => "py_pi",
            Registry::CratesIo => "crates_io",
            Registry::GolangProxy => "golang_proxy",
            Registry::GithubReleases => "github_releases",
            Registry::Terraform => "terraform",
            Registry::RubyGems => "ruby_gems",
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown registry '{0}'")]
pub struct UnknownRegistry(pub String);

impl FromStr for Registry {
    type Err = UnknownRegistry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Registry::ALL
            .iter()
            .copied()
            .find(|registry| registry.as_str() == s)
            .ok_or_else(|| UnknownRegistry(s.to_string()))
    }
}
