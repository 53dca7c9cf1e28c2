//! Web server command.

use console::style;

use crate::llm::{ChatBackend, LlmClient, LlmConfig};

/// Default port when the bind address names only a host.
const DEFAULT_PORT: u16 = 8000;

/// Start the web server.
pub async fn cmd_serve(llm: &LlmConfig, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    // Warn early if the inference daemon is down; requests would fail with 502.
    let client = LlmClient::new(llm.clone())?;
    if client.is_available().await {
        println!(
            "  {} Ollama reachable at {} (chat: {}, clean: {})",
            style("✓").green(),
            llm.endpoint,
            llm.chat_model,
            llm.clean_model
        );
    } else {
        eprintln!(
            "  {} Ollama not reachable at {}. Start it with: ollama serve",
            style("!").yellow(),
            llm.endpoint
        );
    }

    println!(
        "{} Starting pitchcraft server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(llm, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "8000" -> 127.0.0.1:8000
/// - Just a host: "0.0.0.0" -> 0.0.0.0:8000
/// - Host and port: "0.0.0.0:8000" -> 0.0.0.0:8000
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Empty bind address");
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), DEFAULT_PORT))
}
