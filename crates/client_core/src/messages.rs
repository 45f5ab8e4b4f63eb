use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::domain::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKey {
    #[serde(rename = "greetingAm")]
    GreetingAm,
    #[serde(rename = "greetingPm")]
    GreetingPm,
    #[serde(rename = "lastSuccessfulLoginInformation")]
    LastSuccessfulLoginInformation,
    #[serde(rename = "lastFailedLoginInformation")]
    LastFailedLoginInformation,
}

impl MessageKey {
    pub const ALL: [MessageKey; 4] = [
        MessageKey::GreetingAm,
        MessageKey::GreetingPm,
        MessageKey::LastSuccessfulLoginInformation,
        MessageKey::LastFailedLoginInformation,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MessageKey::GreetingAm => "greetingAm",
            MessageKey::GreetingPm => "greetingPm",
            MessageKey::LastSuccessfulLoginInformation => "lastSuccessfulLoginInformation",
            MessageKey::LastFailedLoginInformation => "lastFailedLoginInformation",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.id() == id)
    }
}

pub trait MessageCatalog: Send + Sync {
    fn message(&self, locale: &Locale, key: MessageKey) -> Option<String>;

    /// Locale text, then English, then the bare key id.
    fn resolve(&self, locale: &Locale, key: MessageKey) -> String {
        self.message(locale, key)
            .or_else(|| self.message(&Locale::english(), key))
            .unwrap_or_else(|| key.id().to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<Locale, HashMap<MessageKey, String>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn english_defaults() -> Self {
        let mut catalog = Self::new();
        let en = Locale::english();
        catalog.insert(&en, MessageKey::GreetingAm, "Good morning");
        catalog.insert(&en, MessageKey::GreetingPm, "Good evening");
        catalog.insert(
            &en,
            MessageKey::LastSuccessfulLoginInformation,
            "Last successful login:",
        );
        catalog.insert(
            &en,
            MessageKey::LastFailedLoginInformation,
            "Last failed login:",
        );
        catalog
    }

    pub fn insert(&mut self, locale: &Locale, key: MessageKey, text: impl Into<String>) {
        self.entries
            .entry(locale.clone())
            .or_default()
            .insert(key, text.into());
    }

    pub fn extend_locale(
        &mut self,
        locale: &Locale,
        entries: &HashMap<String, String>,
    ) -> Vec<String> {
        let mut unknown = Vec::new();
        for (id, text) in entries {
            match MessageKey::from_id(id) {
                Some(key) => self.insert(locale, key, text.clone()),
                None => unknown.push(id.clone()),
            }
        }
        unknown.sort();
        unknown
    }
}

impl MessageCatalog for StaticCatalog {
    fn message(&self, locale: &Locale, key: MessageKey) -> Option<String> {
        self.entries
            .get(locale)
            .and_then(|messages| messages.get(&key))
            .cloned()
    }
}
