//! LLM status command.

use console::style;

use crate::llm::{ChatBackend, LlmClient, LlmConfig};

/// Show LLM configuration and the models the inference daemon offers.
pub async fn cmd_llm_models(config: &LlmConfig) -> anyhow::Result<()> {
    let llm_client = LlmClient::new(config.clone())?;

    println!("\n{}", style("LLM Configuration").bold());
    println!("{}", "-".repeat(40));
    println!("{:<20} {}", "Endpoint:", config.endpoint);
    println!("{:<20} {}", "Chat Model:", config.chat_model);
    println!("{:<20} {}", "Clean Model:", config.clean_model);
    println!("{:<20} {}s", "Timeout:", config.timeout_secs);
    match config.temperature {
        Some(t) => println!("{:<20} {:.2}", "Temperature:", t),
        None => println!("{:<20} model default", "Temperature:"),
    }
    println!("{:<20} {}", "Chunk Size:", config.max_chunk_chars);

    if !llm_client.is_available().await {
        println!(
            "\n{} LLM service not available at {}",
            style("!").yellow(),
            config.endpoint
        );
        println!("  Make sure Ollama is running: ollama serve");
        return Ok(());
    }

    println!("\n{}", style("Available Models").bold());
    println!("{}", "-".repeat(40));

    let models = llm_client.list_models().await?;
    if models.is_empty() {
        println!("  No models installed");
        println!("  Install one with: ollama pull {}", config.chat_model);
        return Ok(());
    }

    for model in &models {
        let marker = if *model == config.chat_model || *model == config.clean_model {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        println!("  {} {}", marker, model);
    }

    for wanted in [&config.chat_model, &config.clean_model] {
        if !models.contains(wanted) {
            println!(
                "\n{} Configured model {} is not installed. Run: ollama pull {}",
                style("!").yellow(),
                wanted,
                wanted
            );
        }
    }

    Ok(())
}
