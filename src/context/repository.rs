//! A job extension that maps host paths onto checked-out repositories.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{JobExtension, RepoPath};

/// A repository checked out on the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Repository {
    pub name: String,
    pub path: PathBuf,
}

/// Resolves host paths against a set of repository roots.
///
/// The deepest root containing the path wins, so nested checkouts resolve
/// to the inner repository.
#[derive(Debug, Clone, Default)]
pub struct RepositoryMap {
    repositories: Vec<Repository>,
}

impl RepositoryMap {
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self { repositories }
    }
}

impl JobExtension for RepositoryMap {
    fn convert_local_path(&self, host_path: &Path) -> RepoPath {
        let Some(repo) = self
            .repositories
            .iter()
            .filter(|r| host_path.starts_with(&r.path))
            .max_by_key(|r| r.path.components().count())
        else {
            return RepoPath::default();
        };

        let relative = host_path
            .strip_prefix(&repo.path)
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();

        RepoPath {
            repo_name: Some(repo.name.clone()),
            relative_path: Some(relative).filter(|r| !r.is_empty()),
        }
    }
}
