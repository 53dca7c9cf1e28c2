//! Shared helper functions for CLI commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented prompt over any async reader (stdin in production).
pub struct Prompter<R> {
    lines: Lines<R>,
}

impl Prompter<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `label` and read one line. `None` means end of input.
    pub async fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        print!("{}", label);
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}

/// Whether `input` is the exit word (case-insensitive, surrounding whitespace ignored).
pub fn is_exit_word(input: &str, exit_word: &str) -> bool {
    input.trim().to_lowercase() == exit_word.to_lowercase()
}

/// Resolve a document name typed by the user against the texts directory.
pub fn resolve_document_path(texts_dir: &Path, name: &str) -> PathBuf {
    let expanded = shellexpand::tilde(name.trim());
    let path = Path::new(expanded.as_ref());
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        texts_dir.join(path)
    }
}

/// Spinner shown while waiting on the model.
pub fn waiting_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prompt for a menu selection.
pub const MENU_PROMPT: &str = "\nYou: ";

/// Selection menu shown at startup and after each mode.
pub fn menu_text(exit_word: &str, returned: bool) -> String {
    let header = if returned {
        "Returned to selection menu.\n"
    } else {
        ""
    };
    format!(
        "{header}(Use '{exit_word}' to exit.)\nSelect mode:\n\t[1] Chat with LLM\n\t[2] Clean a document"
    )
}
