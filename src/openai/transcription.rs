use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::core::{OpenAiClient, check_status};
use crate::core::ChatError;

/// Response from `/v1/audio/transcriptions`.
#[derive(Debug, Deserialize)]
pub struct Transcription {
    pub text: String,
}

impl OpenAiClient {
    /// Uploads the audio file as multipart form data. The file is read
    /// up front so a missing file fails before any request is made.
    pub async fn transcription(&self, path: &Path) -> Result<Transcription, ChatError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("audio"));
        tracing::debug!(
            "Transcribing {} ({} bytes) with model {}",
            file_name,
            bytes.len(),
            self.transcription_model
        );

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("model", self.transcription_model.clone());

        let response = self
            .http
            .post(&self.transcription_url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await?;

        let response = check_status(response).await?;
        let transcription = response
            .json::<Transcription>()
            .await
            .inspect_err(|e| tracing::error!("Decoding transcription response failed: {}", e))?;
        Ok(transcription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AppConfig;
    use crate::openai::ChatBackend;
    use mockito::Matcher;
    use std::io::Write;

    fn test_client(server_url: &str) -> OpenAiClient {
        OpenAiClient::new(&AppConfig {
            request_timeout_secs: 5,
            ..AppConfig::new(server_url, "test-key")
        })
    }

    fn staged_audio(contents: &[u8]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("input.m4a")).unwrap();
        file.write_all(contents).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_transcribe_audio() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/audio/transcriptions")
            .match_header("authorization", "Bearer test-key")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="input.m4a""#.to_string()),
                Matcher::Regex(r#"name="model""#.to_string()),
                Matcher::Regex("whisper-1".to_string()),
                Matcher::Regex("fake audio".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text": "こんにちは"}"#)
            .create_async()
            .await;

        let dir = staged_audio(b"fake audio");
        let client = test_client(&server.url());
        let text = client
            .transcribe_audio(&dir.path().join("input.m4a"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(text, "こんにちは");
    }

    #[tokio::test]
    async fn test_transcribe_missing_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/audio/transcriptions")
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&server.url());
        let err = client
            .transcribe_audio(&dir.path().join("nope.m4a"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, ChatError::Io(_)));
    }

    #[tokio::test]
    async fn test_transcribe_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/audio/transcriptions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"transcript": "wrong field"}"#)
            .create_async()
            .await;

        let dir = staged_audio(b"fake audio");
        let client = test_client(&server.url());
        let err = client
            .transcribe_audio(&dir.path().join("input.m4a"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, ChatError::ApiCall { .. }));
    }

    #[tokio::test]
    async fn test_transcribe_server_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/audio/transcriptions")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let dir = staged_audio(b"fake audio");
        let client = test_client(&server.url());
        let err = client
            .transcribe_audio(&dir.path().join("input.m4a"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(err.is_retryable());
    }
}
