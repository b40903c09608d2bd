use std::fmt;

use serde::{Deserialize, Serialize};

use super::client::{LlmClient, PromptGenerator};
use super::request::{PromptRequest, LIGHTING, MOODS, PALETTES, STYLE_TAGS};
use crate::error::PromptError;
use crate::events::Event;
use crate::host::{App, PassContext, Rendered};
use crate::session::{Key, SessionStore};

pub const PROMPT_FORM: Key<PromptRequest> = Key::new("prompt_form");
pub const API_KEY: Key<String> = Key::new("api_key");
pub const LAST_OUTCOME: Key<PromptOutcome> = Key::new("last_outcome");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Authentication,
    RateLimit,
    Other,
}

/// Result of the most recent generate click, kept for later passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PromptOutcome {
    Generated { text: String },
    Failed { kind: FailureKind, message: String },
}

impl From<Result<String, PromptError>> for PromptOutcome {
    fn from(result: Result<String, PromptError>) -> Self {
        match result {
            Ok(text) => PromptOutcome::Generated { text },
            Err(e) => {
                let kind = match e {
                    PromptError::Validation(_) => FailureKind::Validation,
                    PromptError::Authentication => FailureKind::Authentication,
                    PromptError::RateLimit => FailureKind::RateLimit,
                    PromptError::Generic(_) => FailureKind::Other,
                };
                PromptOutcome::Failed {
                    kind,
                    message: e.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    SetDescription(String),
    /// Adds the tag if absent, removes it if present.
    ToggleStyle(String),
    SetMood(Option<String>),
    SetLighting(Option<String>),
    SetPalette(Option<String>),
    SetDetails(Option<String>),
    SetApiKey(String),
    Generate,
    ClearOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptView {
    pub form: PromptRequest,
    pub api_key_set: bool,
    pub style_options: Vec<&'static str>,
    pub mood_options: Vec<&'static str>,
    pub lighting_options: Vec<&'static str>,
    pub palette_options: Vec<&'static str>,
    pub outcome: Option<PromptOutcome>,
}

impl fmt::Display for PromptView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Some(PromptOutcome::Generated { text }) => write!(f, "{text}"),
            Some(PromptOutcome::Failed { message, .. }) => write!(f, "error: {message}"),
            None => write!(f, "Describe an image and press generate."),
        }
    }
}

/// LLM-backed image-prompt helper.
pub struct PromptApp<C> {
    generator: PromptGenerator<C>,
}

impl<C: LlmClient> PromptApp<C> {
    pub fn new(generator: PromptGenerator<C>) -> Self {
        Self { generator }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl<C: LlmClient> App for PromptApp<C> {
    type Action = PromptAction;
    type View = PromptView;

    fn name(&self) -> &'static str {
        "prompt"
    }

    async fn handle(&self, store: &mut SessionStore, action: PromptAction, ctx: &mut PassContext) {
        let form = store.get_or_init(PROMPT_FORM, PromptRequest::default);
        match action {
            PromptAction::SetDescription(text) => form.description = text,
            PromptAction::ToggleStyle(tag) => {
                if let Some(pos) = form.style_tags.iter().position(|t| *t == tag) {
                    form.style_tags.remove(pos);
                } else {
                    form.style_tags.push(tag);
                }
            }
            PromptAction::SetMood(v) => form.mood = non_blank(v),
            PromptAction::SetLighting(v) => form.lighting = non_blank(v),
            PromptAction::SetPalette(v) => form.palette = non_blank(v),
            PromptAction::SetDetails(v) => form.details = non_blank(v),
            PromptAction::SetApiKey(key) => store.set(API_KEY, key),
            PromptAction::Generate => {
                let request = form.clone();
                let api_key = store.get(API_KEY).cloned().unwrap_or_default();
                let outcome = PromptOutcome::from(self.generator.generate(&request, &api_key).await);
                match &outcome {
                    PromptOutcome::Generated { text } => ctx.emit(Event::PromptGenerated {
                        chars: text.chars().count(),
                        at: ctx.now(),
                    }),
                    PromptOutcome::Failed { message, .. } => ctx.emit(Event::PromptFailed {
                        message: message.clone(),
                        at: ctx.now(),
                    }),
                }
                store.set(LAST_OUTCOME, outcome);
            }
            PromptAction::ClearOutcome => {
                store.remove(LAST_OUTCOME);
            }
        }
    }

    fn render(&self, store: &mut SessionStore, _ctx: &mut PassContext) -> Rendered<PromptView> {
        let form = store.get_or_init(PROMPT_FORM, PromptRequest::default).clone();
        Rendered::new(PromptView {
            form,
            api_key_set: store.get(API_KEY).is_some_and(|k| !k.trim().is_empty()),
            style_options: STYLE_TAGS.to_vec(),
            mood_options: MOODS.to_vec(),
            lighting_options: LIGHTING.to_vec(),
            palette_options: PALETTES.to_vec(),
            outcome: store.get(LAST_OUTCOME).cloned(),
        })
    }
}
