use std::path::{Path, PathBuf};

use crate::error::AppError;

const AUDIO_DIR: &str = "audios";
const AUDIO_FILE: &str = "audio.mp3";

/// The single on-disk slot holding the most recently generated clip.
///
/// Each `store` overwrites the previous clip. Concurrent writers are not
/// serialized, so the last write to land wins.
#[derive(Debug, Clone)]
pub struct AudioStore {
    path: PathBuf,
}

impl AudioStore {
    pub fn new(static_dir: impl AsRef<Path>) -> Self {
        Self {
            path: static_dir.as_ref().join(AUDIO_DIR).join(AUDIO_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Public URL under which the static file server exposes the slot.
    pub fn public_url(&self) -> String {
        format!("/{}/{}", AUDIO_DIR, AUDIO_FILE)
    }

    pub async fn store(&self, audio: &[u8]) -> Result<String, AppError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&self.path, audio).await?;

        tracing::debug!("Wrote {} bytes to {}", audio.len(), self.path.display());
        Ok(self.public_url())
    }

    pub async fn read(&self) -> Result<Vec<u8>, AppError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}
