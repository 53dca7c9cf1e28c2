//! Document clean mode.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use console::style;
use tokio::io::AsyncBufRead;

use crate::client::ServerClient;
use crate::config::Settings;

use super::super::helpers::{is_exit_word, resolve_document_path, waiting_spinner, Prompter};

/// Outcome of trying to clean one document.
enum CleanOutcome {
    Cleaned(String),
    NotFound,
}

async fn clean_document(client: &ServerClient, path: &Path) -> anyhow::Result<CleanOutcome> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CleanOutcome::NotFound),
        Err(e) => anyhow::bail!("Could not read {}: {}", path.display(), e),
    };
    tracing::debug!("Read {} chars from {}", text.len(), path.display());

    let spinner = waiting_spinner("Cleaning document...");
    let result = client.clean(&text).await;
    spinner.finish_and_clear();

    Ok(CleanOutcome::Cleaned(result?))
}

/// Clean a single document given on the command line.
///
/// The path is used as given when it exists, otherwise it is looked up in the
/// texts directory.
pub async fn cmd_clean_file(
    client: &ServerClient,
    settings: &Settings,
    file: &Path,
) -> anyhow::Result<()> {
    let path: PathBuf = if tokio::fs::try_exists(file).await.unwrap_or(false) {
        file.to_path_buf()
    } else {
        resolve_document_path(&settings.texts_dir, &file.to_string_lossy())
    };

    match clean_document(client, &path).await? {
        CleanOutcome::Cleaned(reply) => {
            println!("{}", reply);
            Ok(())
        }
        CleanOutcome::NotFound => anyhow::bail!("File not found: {}", path.display()),
    }
}

/// Prompt for document names and clean each one until the exit word or end of input.
///
/// Returns the number of documents cleaned.
pub async fn clean_loop<R: AsyncBufRead + Unpin>(
    client: &ServerClient,
    prompter: &mut Prompter<R>,
    settings: &Settings,
) -> anyhow::Result<usize> {
    println!(
        "====================\n(Use '{}' to exit.)\n -> *[Document Clean Mode]*",
        settings.exit_word
    );

    let mut cleaned = 0;
    while let Some(input) = prompter.prompt("\nDocument's name: ").await? {
        if is_exit_word(&input, &settings.exit_word) {
            break;
        }
        if input.trim().is_empty() {
            println!("Invalid input, please try again.");
            continue;
        }

        let path = resolve_document_path(&settings.texts_dir, &input);
        match clean_document(client, &path).await {
            Ok(CleanOutcome::Cleaned(reply)) => {
                println!("{} {}", style("Cleaned document:").bold(), reply);
                cleaned += 1;
            }
            Ok(CleanOutcome::NotFound) => println!("File not found."),
            Err(e) => eprintln!("{} {}", style("✗").red(), e),
        }
    }

    Ok(cleaned)
}
