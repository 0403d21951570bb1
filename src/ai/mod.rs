//! AI writing tools.
//!
//! This module talks to OpenAI-compatible chat providers and supplies the
//! template text used when none of them answer.

pub mod client;
pub mod fallback;
pub mod service;
pub mod text;

pub use client::{AiClient, AiError, ChatMessage, Completion, CompletionRequest, Provider};
pub use service::{AiService, Generated};
