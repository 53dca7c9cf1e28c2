//! Interactive mode selection menu.

use console::style;
use tokio::io::AsyncBufRead;

use crate::client::ServerClient;
use crate::config::Settings;

use super::super::helpers::{is_exit_word, menu_text, Prompter, MENU_PROMPT};
use super::chat::chat_loop;
use super::clean::clean_loop;

/// A choice typed at the selection menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Chat,
    Clean,
    Exit,
    Invalid,
}

fn parse_choice(input: &str, exit_word: &str) -> MenuChoice {
    if is_exit_word(input, exit_word) {
        return MenuChoice::Exit;
    }
    match input.trim() {
        "1" => MenuChoice::Chat,
        "2" => MenuChoice::Clean,
        _ => MenuChoice::Invalid,
    }
}

/// Run the selection menu until the exit word or end of input.
pub async fn menu_loop<R: AsyncBufRead + Unpin>(
    client: &ServerClient,
    prompter: &mut Prompter<R>,
    settings: &Settings,
) -> anyhow::Result<()> {
    if !client.health().await {
        eprintln!(
            "{} Server not reachable at {}. Start it with: pitch serve",
            style("!").yellow(),
            client.base_url()
        );
    }

    println!("{}", menu_text(&settings.exit_word, false));

    while let Some(input) = prompter.prompt(MENU_PROMPT).await? {
        match parse_choice(&input, &settings.exit_word) {
            MenuChoice::Chat => {
                chat_loop(client, prompter, &settings.exit_word).await?;
                println!("{}", menu_text(&settings.exit_word, true));
            }
            MenuChoice::Clean => {
                clean_loop(client, prompter, settings).await?;
                println!("{}", menu_text(&settings.exit_word, true));
            }
            MenuChoice::Exit => break,
            MenuChoice::Invalid => println!("Invalid input. Try again."),
        }
    }

    println!("Goodbye.");
    Ok(())
}
