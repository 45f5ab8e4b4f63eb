use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardField {
    Name,
    Surname,
    Email,
    LastPresentLogged,
    LastSuccessfulLogged,
    LastFailedLogged,
}

impl DashboardField {
    pub const ALL: [DashboardField; 6] = [
        DashboardField::Name,
        DashboardField::Surname,
        DashboardField::Email,
        DashboardField::LastPresentLogged,
        DashboardField::LastSuccessfulLogged,
        DashboardField::LastFailedLogged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DashboardField::Name => "name",
            DashboardField::Surname => "surname",
            DashboardField::Email => "email",
            DashboardField::LastPresentLogged => "last_present_logged",
            DashboardField::LastSuccessfulLogged => "last_successful_logged",
            DashboardField::LastFailedLogged => "last_failed_logged",
        }
    }

    pub fn action_name(self) -> &'static str {
        match self {
            DashboardField::Name => "getName",
            DashboardField::Surname => "getSurname",
            DashboardField::Email => "getEmail",
            DashboardField::LastPresentLogged => "getLastPresentLogged",
            DashboardField::LastSuccessfulLogged => "getLastSuccessfulLogged",
            DashboardField::LastFailedLogged => "getLastFailedLogged",
        }
    }

    pub fn is_timestamp(self) -> bool {
        matches!(
            self,
            DashboardField::LastPresentLogged
                | DashboardField::LastSuccessfulLogged
                | DashboardField::LastFailedLogged
        )
    }
}

impl fmt::Display for DashboardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Timestamp(_) => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(at) => Some(*at),
            FieldValue::Text(_) => None,
        }
    }

    /// Empty text is treated the same as a missing value.
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum FieldState {
    #[default]
    NotRequested,
    Pending,
    Resolved(Option<FieldValue>),
}

impl FieldState {
    pub fn value(&self) -> Option<&FieldValue> {
        match self {
            FieldState::Resolved(Some(value)) if !value.is_blank() => Some(value),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.value().is_some()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FieldState::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub const ENGLISH: &'static str = "en";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_ascii_lowercase())
    }

    pub fn english() -> Self {
        Self(Self::ENGLISH.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_english(&self) -> bool {
        self.0 == Self::ENGLISH
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meridiem {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Meridiem {
    pub fn as_str(self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_present_logged: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_successful_logged: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failed_logged: Option<DateTime<Utc>>,
}

impl ProfileSnapshot {
    pub fn get(&self, field: DashboardField) -> Option<FieldValue> {
        match field {
            DashboardField::Name => self.name.clone().map(FieldValue::Text),
            DashboardField::Surname => self.surname.clone().map(FieldValue::Text),
            DashboardField::Email => self.email.clone().map(FieldValue::Text),
            DashboardField::LastPresentLogged => {
                self.last_present_logged.map(FieldValue::Timestamp)
            }
            DashboardField::LastSuccessfulLogged => {
                self.last_successful_logged.map(FieldValue::Timestamp)
            }
            DashboardField::LastFailedLogged => self.last_failed_logged.map(FieldValue::Timestamp),
        }
    }
}
