//! HTTP request handlers for the web server.

mod api;
mod chat;
mod clean;
mod helpers;

// Re-export handlers for use by the router
pub use api::{api_models, health};
pub use chat::{chat, delete_session, get_session};
pub use clean::clean;
