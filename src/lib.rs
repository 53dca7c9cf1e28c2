//! pitchcraft - sales-pitch practice and document cleaning over a local LLM.
//!
//! A small web server keeps per-session chat history for a skeptical-buyer
//! persona and cleans documents chunk by chunk. The `pitch` binary drives it
//! from an interactive terminal menu.

pub mod cli;
pub mod client;
pub mod config;
pub mod llm;
pub mod server;
pub mod services;
pub mod session;
pub mod utils;

#[cfg(test)]
mod test_support;
