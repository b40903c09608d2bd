//! Image-prompt generation through a chat-completions API.
//!
//! The user describes a picture and picks a few style options; the app
//! asks an LLM to turn that into a single comma-separated English prompt.
//! One request per click, no retries.

mod app;
mod client;
mod request;

pub use app::{FailureKind, PromptAction, PromptApp, PromptOutcome, PromptView};
pub use client::{ChatRequest, LlmClient, OpenAiClient, PromptGenerator};
pub use request::{
    ChatMessage, PromptRequest, Role, LIGHTING, MOODS, PALETTES, STYLE_TAGS, SYSTEM_INSTRUCTION,
};
