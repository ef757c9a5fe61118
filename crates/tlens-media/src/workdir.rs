//! Per-request working directories.
//!
//! Every analysis run gets its own directory named by its [`AnalysisId`],
//! so concurrent runs on the same host never collide on artifact names.
//! Callers must remove the directory on every exit path; `Drop` is a
//! best-effort backstop.

use std::path::{Path, PathBuf};

use tlens_models::AnalysisId;
use tokio::fs;
use tracing::warn;

use crate::error::MediaResult;

/// Scoped working directory for one analysis run.
#[derive(Debug)]
pub struct SessionDir {
    root: PathBuf,
    cleaned: bool,
}

impl SessionDir {
    /// Create `{base}/{analysis_id}`, including missing parents.
    pub async fn create(base: impl AsRef<Path>, id: &AnalysisId) -> MediaResult<Self> {
        let root = base.as_ref().join(id.as_str());
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            cleaned: false,
        })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of a file inside this session directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Remove the directory and everything in it.
    pub async fn cleanup(mut self) -> MediaResult<()> {
        self.cleaned = true;
        fs::remove_dir_all(&self.root).await?;
        Ok(())
    }

    /// Remove the directory without consuming, for shared-ownership callers.
    pub async fn cleanup_in_place(&mut self) -> MediaResult<()> {
        self.cleaned = true;
        fs::remove_dir_all(&self.root).await?;
        Ok(())
    }
}

impl Drop for SessionDir {
    fn drop(&mut self) {
        if self.cleaned {
            return;
        }
        // Backstop for paths that never reached an explicit cleanup
        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    "Failed to remove session directory {}: {}",
                    self.root.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_and_cleanup() {
        let base = TempDir::new().unwrap();
        let id = AnalysisId::new();

        let session = SessionDir::create(base.path(), &id).await.unwrap();
        let file = session.file("chart.png");
        fs::write(&file, b"png").await.unwrap();
        assert!(file.exists());

        let root = session.path().to_path_buf();
        session.cleanup().await.unwrap();
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let base = TempDir::new().unwrap();
        let id = AnalysisId::new();

        let root = {
            let session = SessionDir::create(base.path(), &id).await.unwrap();
            fs::write(session.file("report.pdf"), b"pdf").await.unwrap();
            session.path().to_path_buf()
        };

        assert!(!root.exists(), "drop should remove the session directory");
    }

    #[tokio::test]
    async fn test_distinct_runs_get_distinct_directories() {
        let base = TempDir::new().unwrap();
        let a = SessionDir::create(base.path(), &AnalysisId::new())
            .await
            .unwrap();
        let b = SessionDir::create(base.path(), &AnalysisId::new())
            .await
            .unwrap();
        assert_ne!(a.path(), b.path());
    }
}
