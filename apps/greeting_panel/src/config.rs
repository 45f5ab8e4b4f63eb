use std::{collections::HashMap, fs, path::Path, path::PathBuf};

use anyhow::{anyhow, Context};
use chrono::FixedOffset;
use client_core::{GreetingRule, StaticCatalog, DEFAULT_NAMESPACE};
use serde::Deserialize;
use shared::domain::Locale;

pub const DEFAULT_CONFIG_PATH: &str = "greeting_panel.toml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub locale: String,
    pub greeting_rule: GreetingRule,
    pub utc_offset_minutes: i32,
    pub namespace: String,
    pub profile_path: Option<PathBuf>,
    pub messages: HashMap<String, HashMap<String, String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Locale::ENGLISH.into(),
            greeting_rule: GreetingRule::Reference,
            utc_offset_minutes: 0,
            namespace: DEFAULT_NAMESPACE.into(),
            profile_path: None,
            messages: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn locale(&self) -> Locale {
        Locale::new(&self.locale)
    }

    pub fn utc_offset(&self) -> anyhow::Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow!("utc offset of {} minutes is out of range", self.utc_offset_minutes))
    }

    pub fn catalog(&self) -> StaticCatalog {
        let mut catalog = StaticCatalog::english_defaults();
        for (locale, entries) in &self.messages {
            let unknown = catalog.extend_locale(&Locale::new(locale), entries);
            for id in unknown {
                tracing::warn!(locale = %locale, id = %id, "ignoring unknown message id");
            }
        }
        catalog
    }
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

pub(crate) fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("APP__LOCALE") {
        settings.locale = v;
    }

    if let Some(v) = lookup("APP__GREETING_RULE") {
        settings.greeting_rule = v
            .parse()
            .map_err(|err: String| anyhow!(err))
            .context("APP__GREETING_RULE")?;
    }

    if let Some(v) = lookup("APP__UTC_OFFSET_MINUTES") {
        settings.utc_offset_minutes = v
            .trim()
            .parse()
            .with_context(|| format!("APP__UTC_OFFSET_MINUTES is not an integer: '{v}'"))?;
    }

    if let Some(v) = lookup("APP__NAMESPACE") {
        settings.namespace = v;
    }

    if let Some(v) = lookup("APP__PROFILE_PATH") {
        settings.profile_path = Some(PathBuf::from(v));
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
