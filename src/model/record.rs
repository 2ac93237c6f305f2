use serde::{Deserialize, Serialize};

/// One `STRING <n> { ... }` block as read from a WTS file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StringRecord {
    pub number: u32,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub content: String,
}

/// A stored string as handed over by the persistence layer for export.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ExportRecord {
    #[serde(alias = "stringNumber", alias = "number")]
    pub string_number: u32,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default, alias = "originalText", alias = "content")]
    pub original_text: String,

    #[serde(default, alias = "translatedText")]
    pub translated_text: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

impl ExportRecord {
    pub fn translation(&self) -> &str {
        self.translated_text.as_deref().unwrap_or("")
    }
}

/// What an exported file is meant for.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    /// Translated text where completed, original text elsewhere.
    #[default]
    Release,
    /// Same as release, each text prefixed with `[<number>]_`.
    Debug,
    /// Completed translations only.
    Upload,
}
