use std::{
    io,
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create fixture workspace: {source}")]
    Create {
        #[source]
        source: io::Error,
    },
}

/// Per-fixture scratch directory holding downloaded packages.
#[derive(Debug)]
pub struct FixtureWorkspace {
    root: TempDir,
}

impl FixtureWorkspace {
    pub fn create(app_id: &str) -> Result<Self, WorkspaceError> {
        let root = tempfile::Builder::new()
            .prefix(&format!("cf-fixture-{app_id}-"))
            .tempdir()
            .map_err(|source| WorkspaceError::Create { source })?;

        info!(root = %root.path().display(), "fixture workspace created");
        Ok(Self { root })
    }

    #[must_use]
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Where the package for this app is stored, named `<app_id><package>`.
    #[must_use]
    pub fn artifact_path(&self, app_id: &str, package_name: &str) -> PathBuf {
        self.root.path().join(format!("{app_id}{package_name}"))
    }

    /// Keep the directory on disk and return its location.
    #[must_use]
    pub fn persist(self) -> PathBuf {
        self.root.keep()
    }
}
