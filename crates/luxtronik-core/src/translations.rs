// ── Entity title translations ──
//
// Loaded once per coordinator from `texts.{lang}.json`, a flat
// key → title object. Missing keys fall back to a title-cased key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::DEFAULT_LANGUAGE;
use crate::error::CoreError;

/// Instance-scoped title lookup.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    language: String,
    texts: HashMap<String, String>,
}

impl Translations {
    /// An empty table; every title falls back to the key.
    pub fn empty(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            texts: HashMap::new(),
        }
    }

    pub fn from_map(language: impl Into<String>, texts: HashMap<String, String>) -> Self {
        Self {
            language: language.into(),
            texts,
        }
    }

    /// Load the texts for `language` from `dir`.
    ///
    /// The language is normalized first (`"de-AT"` → `"de"`); when no file
    /// exists for it, English is used.
    pub fn load(dir: &Path, language: &str) -> Result<Self, CoreError> {
        let language = normalize_language(dir, language);
        let path = texts_path(dir, &language);
        let raw = std::fs::read_to_string(&path).map_err(|e| CoreError::Translations {
            message: format!("{}: {e}", path.display()),
        })?;
        let texts: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|e| CoreError::Translations {
                message: format!("{}: {e}", path.display()),
            })?;
        debug!(%language, entries = texts.len(), "loaded translations");
        Ok(Self { language, texts })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Translated title for `key`, or the title-cased key.
    pub fn title(&self, key: &str) -> String {
        if let Some(text) = self.texts.get(key) {
            return text.clone();
        }
        warn!(key, language = %self.language, "no translation, using key");
        title_case(key)
    }
}

fn texts_path(dir: &Path, language: &str) -> PathBuf {
    dir.join(format!("texts.{language}.json"))
}

/// Lower-case, keep the part before `-`, fall back to English if there
/// is no texts file for the result.
pub fn normalize_language(dir: &Path, language: &str) -> String {
    let lower = language.to_lowercase();
    let base = lower.split('-').next().unwrap_or_default();
    if !base.is_empty() && texts_path(dir, base).is_file() {
        base.to_owned()
    } else {
        DEFAULT_LANGUAGE.to_owned()
    }
}

/// `domestic_water` → `Domestic Water`.
pub fn title_case(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
