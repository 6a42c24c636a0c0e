use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::permissions;
use crate::core::{AppConfig, ChatError};
use crate::openai::ChatBackend;

/// Picks up audio dropped at a fixed staging path by some external
/// recorder and turns it into text.
///
/// The staging file is only removed after it was transcribed, so a
/// failed transcription leaves it in place and a successful one is
/// never picked up twice.
pub struct AudioIntake {
    staging_path: PathBuf,
    poll_interval: Duration,
}

impl AudioIntake {
    pub fn new(staging_path: impl Into<PathBuf>, poll_interval: Duration) -> Self {
        Self {
            staging_path: staging_path.into(),
            poll_interval,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.staging_path, config.poll_interval())
    }

    pub fn staging_path(&self) -> &Path {
        &self.staging_path
    }

    /// Waits for the staging file and returns its transcription.
    /// Returns `Ok(None)` when `cancel` fires while waiting.
    pub async fn next_utterance<B: ChatBackend + ?Sized>(
        &self,
        backend: &B,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, ChatError> {
        if !self.wait_for_file(cancel).await? {
            return Ok(None);
        }
        if let Ok(perms) = permissions::inspect(&self.staging_path) {
            tracing::debug!(
                "Found {} with permissions {}",
                self.staging_path.display(),
                perms
            );
        }

        let text = backend.transcribe_audio(&self.staging_path).await?;
        tokio::fs::remove_file(&self.staging_path)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "Failed to remove {} after transcribing: {}",
                    self.staging_path.display(),
                    e
                )
            })?;
        tracing::debug!("Consumed {}", self.staging_path.display());

        Ok(Some(text))
    }

    // Returns false if cancelled before the file showed up
    async fn wait_for_file(&self, cancel: &CancellationToken) -> Result<bool, ChatError> {
        loop {
            if cancel.is_cancelled() {
                return Ok(false);
            }
            if tokio::fs::try_exists(&self.staging_path).await? {
                return Ok(true);
            }
            tokio::select! {
                _ = cancel.cancelled() => return Ok(false),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}
