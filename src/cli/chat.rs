use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::print_exchange;
use crate::chat::ChatSession;
use crate::core::AppConfig;
use crate::openai::OpenAiClient;

const EXIT_COMMAND: &str = "exit";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Exit,
    Question(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let question = line.trim();
    if question == EXIT_COMMAND {
        Input::Exit
    } else {
        Input::Question(question)
    }
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let backend = OpenAiClient::new(config);
    let (mut session, primed) = ChatSession::start(backend, config)
        .await
        .context("Failed to prime the conversation")?;
    println!("total token: {}", primed.usage.total_tokens);

    let mut rl = DefaultEditor::new().context("Failed to open the line editor")?;

    loop {
        let readline = rl.readline("Question: ");
        match readline {
            Ok(line) => {
                let question = match parse_input(&line) {
                    Input::Exit => break,
                    Input::Question(question) => question,
                };
                let _ = rl.add_history_entry(question);
                let exchange = session
                    .exchange(question)
                    .await
                    .context("Chat exchange failed")?;
                print_exchange(&exchange);
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        }
    }

    tracing::info!(
        "Chat ended with {} messages in history",
        session.conversation().len()
    );
    Ok(())
}
