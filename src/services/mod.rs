//! Service layer for chat and cleaning logic.
//!
//! Services are independent of the HTTP layer and can be driven by the
//! web server or directly from the CLI.

pub mod chat;
pub mod clean;

pub use chat::{ChatService, ChatTurn};
pub use clean::CleanService;
