//! UUID-keyed report storage.
//!
//! Each artifact lands in `<root>/<id>/<file name>`, so concurrent requests
//! never write to the same path. Files are written to a temporary file in the
//! target directory and renamed into place once complete.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::{ReportArtifact, REPORT_FILE_NAME};

/// Directory of written reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStore {
    root: PathBuf,
}

impl ReportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location a report with `id` is stored at.
    pub fn path_for(&self, id: Uuid) -> PathBuf {
        self.root.join(id.to_string()).join(REPORT_FILE_NAME)
    }

    /// Write `artifact` and return its path.
    ///
    /// # Errors
    /// Returns [`Error::ReportWrite`] if the directory cannot be created or the
    /// file cannot be written.
    pub fn save(&self, artifact: &ReportArtifact) -> Result<PathBuf> {
        let dir = self.root.join(artifact.id().to_string());
        fs::create_dir_all(&dir).map_err(|source| Error::ReportWrite {
            path: dir.clone(),
            source,
        })?;

        let target = dir.join(artifact.file_name());
        let write_err = |source| Error::ReportWrite {
            path: target.clone(),
            source,
        };

        let mut file = NamedTempFile::new_in(&dir).map_err(write_err)?;
        file.write_all(artifact.bytes()).map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(&target).map_err(|e| write_err(e.error))?;

        info!(
            id = %artifact.id(),
            bytes = artifact.bytes().len(),
            "wrote report to {}",
            target.display()
        );
        Ok(target)
    }

    /// Read back the report stored under `id`.
    pub fn load(&self, id: Uuid) -> Result<ReportArtifact> {
        let bytes = fs::read(self.path_for(id))?;
        Ok(ReportArtifact {
            id,
            file_name: REPORT_FILE_NAME.to_string(),
            bytes,
        })
    }
}
