use serde::{Deserialize, Serialize};

fn default_title() -> String {
    "strings".to_string()
}

/// Project metadata used to name downloaded files.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    #[serde(default = "default_title", alias = "name")]
    pub title: String,

    #[serde(default, alias = "target_language")]
    pub locale: String,

    #[serde(default)]
    pub version: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            title: default_title(),
            locale: String::new(),
            version: String::new(),
        }
    }
}

impl ProjectInfo {
    /// `<title> [<locale>][<version>].wts`
    pub fn file_name(&self) -> String {
        format!("{} [{}][{}].wts", self.title.trim(), self.locale, self.version)
    }
}
