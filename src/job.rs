//! Job files: the starting state of a replayed run.
//!
//! A job file is TOML describing what the worker would know before the
//! first task runs:
//!
//! ```toml
//! read-only-variables = true
//!
//! [[variables]]
//! name = "system.teamproject"
//! value = "fabrikam"
//! read-only = true
//!
//! [[endpoints]]
//! id = "5e1a3c8e-0000-4000-8000-000000000001"
//! url = "https://api.example.com/"
//!
//! [[path-mappings]]
//! container = "/__w"
//! host = "/home/agent/_work"
//!
//! [[repositories]]
//! name = "self"
//! path = "/home/agent/_work/1/s"
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use uuid::Uuid;

use crate::context::{MemoryContext, PathMapping, Repository, RepositoryMap};
use crate::model::{Endpoint, Variable};

/// Errors loading a job file.
#[derive(Debug, thiserror::Error)]
pub enum JobFileError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid job file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("endpoint {0} is defined more than once")]
    DuplicateEndpoint(Uuid),
}

/// The parsed contents of a job file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct JobFile {
    /// Overrides the configured read-only enforcement for this job.
    pub read_only_variables: Option<bool>,

    #[serde(default)]
    pub variables: Vec<Variable>,

    #[serde(default)]
    pub endpoints: Vec<Endpoint>,

    #[serde(default)]
    pub path_mappings: Vec<PathMapping>,

    /// When present, issues are attributed to these repositories.
    pub repositories: Option<Vec<Repository>>,
}

impl JobFile {
    pub fn load(path: &Path) -> Result<Self, JobFileError> {
        let contents = fs::read_to_string(path).map_err(|source| JobFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let job = Self::parse(&contents).map_err(|source| JobFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        job.validate()?;
        Ok(job)
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    fn validate(&self) -> Result<(), JobFileError> {
        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if !seen.insert(endpoint.id) {
                return Err(JobFileError::DuplicateEndpoint(endpoint.id));
            }
        }
        Ok(())
    }

    /// Builds the context a run of this job starts from.
    ///
    /// `enforce_read_only` applies unless the job file sets its own.
    pub fn into_context(self, enforce_read_only: bool) -> MemoryContext {
        let mut ctx = MemoryContext::new();
        ctx.enforce_read_only = self.read_only_variables.unwrap_or(enforce_read_only);
        for variable in self.variables {
            ctx.insert_variable(variable);
        }
        for endpoint in &self.endpoints {
            for value in endpoint.auth_parameters.values() {
                ctx.masker.add_value(value);
            }
        }
        ctx.endpoints = self.endpoints;
        ctx.path_mappings = self.path_mappings;
        ctx.repositories = self.repositories.map(RepositoryMap::new);
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    const JOB: &str = r#"
[[variables]]
name = "token"
value = "abc123"
secret = true

[[variables]]
name = "system.teamproject"
value = "fabrikam"
read-only = true

[[endpoints]]
id = "5e1a3c8e-0000-4000-8000-000000000001"
url = "https://api.example.com/"

[endpoints.auth-parameters]
password = "hunter2"

[[path-mappings]]
container = "/__w"
host = "/home/agent/_work"

[[repositories]]
name = "self"
path = "/home/agent/_work/1/s"
"#;

    fn write(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn builds_context_from_job_file() {
        let (_dir, path) = write(JOB);
        let ctx = JobFile::load(&path).unwrap().into_context(true);

        assert!(ctx.enforce_read_only);
        assert!(ctx.variable("system.teamproject").unwrap().read_only);
        assert_eq!(ctx.endpoints.len(), 1);
        assert_eq!(ctx.path_mappings.len(), 1);
        assert!(ctx.repositories.is_some());
        assert_eq!(ctx.masker.mask("abc123 hunter2"), "*** ***");
    }

    #[test]
    fn job_setting_overrides_enforcement() {
        let (_dir, path) = write("read-only-variables = false\n");
        let ctx = JobFile::load(&path).unwrap().into_context(true);
        assert!(!ctx.enforce_read_only);
    }

    #[test]
    fn empty_job_has_no_extension() {
        let (_dir, path) = write("");
        let ctx = JobFile::load(&path).unwrap().into_context(false);
        assert!(ctx.repositories.is_none());
        assert!(ctx.variables.is_empty());
    }

    #[test]
    fn duplicate_endpoints_rejected() {
        let (_dir, path) = write(
            r#"
[[endpoints]]
id = "5e1a3c8e-0000-4000-8000-000000000001"

[[endpoints]]
id = "5e1a3c8e-0000-4000-8000-000000000001"
"#,
        );
        assert!(matches!(
            JobFile::load(&path),
            Err(JobFileError::DuplicateEndpoint(_))
        ));
    }

    #[test]
    fn malformed_job_names_the_file() {
        let (_dir, path) = write("variables = 3\n");
        let err = JobFile::load(&path).unwrap_err();
        assert!(matches!(err, JobFileError::Parse { .. }));
        assert!(err.to_string().contains("job.toml"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let err = JobFile::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, JobFileError::Read { .. }));
    }
}
