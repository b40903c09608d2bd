use indoc::indoc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const STYLE_TAGS: &[&str] = &[
    "photorealistic",
    "anime",
    "watercolor",
    "oil painting",
    "digital art",
    "pixel art",
    "3D render",
    "pencil sketch",
    "cyberpunk",
    "fantasy",
    "minimalist",
    "studio ghibli style",
];

pub const MOODS: &[&str] = &[
    "peaceful",
    "dramatic",
    "mysterious",
    "cheerful",
    "melancholic",
    "epic",
    "cozy",
    "eerie",
];

pub const LIGHTING: &[&str] = &[
    "golden hour",
    "soft natural light",
    "neon lights",
    "cinematic lighting",
    "backlit",
    "moonlight",
    "studio lighting",
    "volumetric light",
];

pub const PALETTES: &[&str] = &[
    "pastel",
    "vibrant",
    "monochrome",
    "warm tones",
    "cool tones",
    "earthy",
    "black and white",
    "neon",
];

pub const SYSTEM_INSTRUCTION: &str = indoc! {"
    You are an expert prompt writer for image-generation models.
    Turn the user's request into exactly one English prompt.
    Write it as comma-separated descriptors, most important subject first.
    Do not include generation parameters such as aspect ratio, seeds or model flags.
    Reply with the prompt only, without explanations, quotes or commentary.
"};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// What the user asked for. Only `description` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub description: String,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub lighting: Option<String>,
    #[serde(default)]
    pub palette: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl PromptRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn style(mut self, tag: impl Into<String>) -> Self {
        self.style_tags.push(tag.into());
        self
    }

    pub fn mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn lighting(mut self, lighting: impl Into<String>) -> Self {
        self.lighting = Some(lighting.into());
        self
    }

    pub fn palette(mut self, palette: impl Into<String>) -> Self {
        self.palette = Some(palette.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// The key is checked before the description, so a blank form reports
    /// the missing key first.
    pub fn validate(&self, api_key: &str) -> Result<(), ValidationError> {
        if api_key.trim().is_empty() {
            return Err(ValidationError::MissingApiKey);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        Ok(())
    }

    /// One labelled line per non-empty field.
    pub fn user_message(&self) -> String {
        let styles: Vec<&str> = self
            .style_tags
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        let mut lines = vec![format!("Subject: {}", self.description.trim())];
        if !styles.is_empty() {
            lines.push(format!("Style: {}", styles.join(", ")));
        }
        let optional = [
            ("Mood", &self.mood),
            ("Lighting", &self.lighting),
            ("Color palette", &self.palette),
            ("Additional details", &self.details),
        ];
        for (label, value) in optional {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                lines.push(format!("{label}: {v}"));
            }
        }
        lines.join("\n")
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::new(Role::System, SYSTEM_INSTRUCTION),
            ChatMessage::new(Role::User, self.user_message()),
        ]
    }
}
