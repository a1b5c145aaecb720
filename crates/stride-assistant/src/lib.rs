//! Optional shopping assistant backed by a hosted chat completion API.
//!
//! Whether the assistant is available is decided once at startup from the
//! environment (see [`Assistant::from_config`]). When it is not, every call
//! returns [`AssistantError::Disabled`] and the storefront shows a notice
//! instead of the chat panel.

pub mod assistant;
pub mod client;
pub mod error;
pub mod prompt;

pub use assistant::{Assistant, Capability};
pub use client::{ChatCompletion, OpenAiChatClient};
pub use error::AssistantError;
