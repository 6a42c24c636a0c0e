use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use super::print_exchange;
use crate::audio::AudioIntake;
use crate::chat::ChatSession;
use crate::core::AppConfig;
use crate::openai::OpenAiClient;

/// Runs until Ctrl-C or the first error. There's no exit command,
/// the only input is whatever gets recorded.
pub async fn run(config: &AppConfig) -> Result<()> {
    let backend = OpenAiClient::new(config);
    let intake = AudioIntake::from_config(config);
    let (mut session, primed) = ChatSession::start(backend, config)
        .await
        .context("Failed to prime the conversation")?;
    println!("total token: {}", primed.usage.total_tokens);

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    tracing::info!("Waiting for audio at {}", intake.staging_path().display());
    loop {
        let question = match intake
            .next_utterance(session.backend(), &cancel)
            .await
            .context("Failed to transcribe staged audio")?
        {
            Some(question) => question,
            None => break,
        };
        println!("Question: {}", question);

        let exchange = session
            .exchange(&question)
            .await
            .context("Chat exchange failed")?;
        print_exchange(&exchange);
    }

    tracing::info!(
        "Voice chat stopped with {} messages in history",
        session.conversation().len()
    );
    Ok(())
}
