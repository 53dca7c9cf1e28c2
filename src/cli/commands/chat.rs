//! Interactive chat mode.

use console::style;
use tokio::io::AsyncBufRead;

use crate::client::ServerClient;

use super::super::helpers::{is_exit_word, waiting_spinner, Prompter};

/// Chat with the model until the exit word or end of input.
///
/// The session id returned by the server is carried into every following
/// turn. Returns the last session id, if any turn succeeded.
pub async fn chat_loop<R: AsyncBufRead + Unpin>(
    client: &ServerClient,
    prompter: &mut Prompter<R>,
    exit_word: &str,
) -> anyhow::Result<Option<String>> {
    println!(
        "====================\n(Use '{}' to exit.)\n -> *[LLM Chat Mode]*",
        exit_word
    );

    let mut session_id: Option<String> = None;
    while let Some(input) = prompter.prompt("\nYou: ").await? {
        if is_exit_word(&input, exit_word) {
            break;
        }

        let spinner = waiting_spinner("Waiting for the buyer...");
        let result = client.chat(&input, session_id.as_deref()).await;
        spinner.finish_and_clear();

        match result {
            Ok(reply) => {
                println!("{} {}", style("LLM:").bold(), reply.reply);
                session_id = Some(reply.session_id);
            }
            Err(e) => eprintln!("{} {}", style("✗").red(), e),
        }
    }

    Ok(session_id)
}
