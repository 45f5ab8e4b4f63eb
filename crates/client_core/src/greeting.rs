use std::{fmt, str::FromStr};

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use shared::domain::{Locale, Meridiem};
use tracing::debug;

use crate::messages::MessageKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingRule {
    #[default]
    Reference,
    LocaleScoped,
}

impl GreetingRule {
    pub fn clauses(self) -> &'static [EveningClause] {
        match self {
            GreetingRule::Reference => REFERENCE_CLAUSES,
            GreetingRule::LocaleScoped => LOCALE_SCOPED_CLAUSES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GreetingRule::Reference => "reference",
            GreetingRule::LocaleScoped => "locale_scoped",
        }
    }
}

impl fmt::Display for GreetingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GreetingRule {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reference" => Ok(GreetingRule::Reference),
            "locale_scoped" => Ok(GreetingRule::LocaleScoped),
            other => Err(format!(
                "unknown greeting rule '{other}' (expected 'reference' or 'locale_scoped')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleScope {
    English,
    NonEnglish,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeridiemScope {
    Am,
    Pm,
    /// Only 24-hour readings, which carry no meridiem.
    Absent,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourBound {
    AtLeast(u32),
    AtMost(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EveningClause {
    pub locale: LocaleScope,
    pub meridiem: MeridiemScope,
    pub hour: HourBound,
}

impl EveningClause {
    const fn new(locale: LocaleScope, meridiem: MeridiemScope, hour: HourBound) -> Self {
        Self {
            locale,
            meridiem,
            hour,
        }
    }

    pub fn matches(&self, locale: &Locale, hour: u32, meridiem: Option<Meridiem>) -> bool {
        let locale_ok = match self.locale {
            LocaleScope::English => locale.is_english(),
            LocaleScope::NonEnglish => !locale.is_english(),
            LocaleScope::Any => true,
        };
        let meridiem_ok = match self.meridiem {
            MeridiemScope::Am => meridiem == Some(Meridiem::Am),
            MeridiemScope::Pm => meridiem == Some(Meridiem::Pm),
            MeridiemScope::Absent => meridiem.is_none(),
            MeridiemScope::Any => true,
        };
        let hour_ok = match self.hour {
            HourBound::AtLeast(min) => hour >= min,
            HourBound::AtMost(max) => hour <= max,
        };
        locale_ok && meridiem_ok && hour_ok
    }
}

pub const ENGLISH_EVENING_FROM: u32 = 7;
pub const EVENING_FROM_24H: u32 = 19;
pub const NIGHT_UNTIL: u32 = 5;

pub const REFERENCE_CLAUSES: &[EveningClause] = &[
    EveningClause::new(
        LocaleScope::English,
        MeridiemScope::Pm,
        HourBound::AtLeast(ENGLISH_EVENING_FROM),
    ),
    EveningClause::new(LocaleScope::Any, MeridiemScope::Am, HourBound::AtMost(NIGHT_UNTIL)),
    EveningClause::new(
        LocaleScope::NonEnglish,
        MeridiemScope::Any,
        HourBound::AtLeast(EVENING_FROM_24H),
    ),
    EveningClause::new(
        LocaleScope::NonEnglish,
        MeridiemScope::Any,
        HourBound::AtMost(NIGHT_UNTIL),
    ),
];

pub const LOCALE_SCOPED_CLAUSES: &[EveningClause] = &[
    EveningClause::new(
        LocaleScope::English,
        MeridiemScope::Pm,
        HourBound::AtLeast(ENGLISH_EVENING_FROM),
    ),
    EveningClause::new(
        LocaleScope::English,
        MeridiemScope::Am,
        HourBound::AtMost(NIGHT_UNTIL),
    ),
    EveningClause::new(
        LocaleScope::NonEnglish,
        MeridiemScope::Absent,
        HourBound::AtLeast(EVENING_FROM_24H),
    ),
    EveningClause::new(
        LocaleScope::NonEnglish,
        MeridiemScope::Absent,
        HourBound::AtMost(NIGHT_UNTIL),
    ),
];

fn hour_in_range(hour: u32, meridiem: Option<Meridiem>) -> bool {
    match meridiem {
        Some(_) => (1..=12).contains(&hour),
        None => hour <= 23,
    }
}

/// `hour` is a 12-hour value when `meridiem` is given, a 24-hour value
/// otherwise. Out-of-range hours are never evening.
pub fn is_evening_period(
    rule: GreetingRule,
    locale: &Locale,
    hour: u32,
    meridiem: Option<Meridiem>,
) -> bool {
    if !hour_in_range(hour, meridiem) {
        debug!(hour, meridiem = ?meridiem, "hour out of range, treating as morning");
        return false;
    }
    rule.clauses()
        .iter()
        .any(|clause| clause.matches(locale, hour, meridiem))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingPeriod {
    Morning,
    Evening,
}

impl GreetingPeriod {
    pub fn message_key(self) -> MessageKey {
        match self {
            GreetingPeriod::Morning => MessageKey::GreetingAm,
            GreetingPeriod::Evening => MessageKey::GreetingPm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub hour12: u32,
    pub meridiem: Meridiem,
    pub hour24: u32,
}

impl ClockReading {
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        let (is_pm, hour12) = time.hour12();
        Self {
            hour12,
            meridiem: if is_pm { Meridiem::Pm } else { Meridiem::Am },
            hour24: time.hour(),
        }
    }
}

pub fn classify(rule: GreetingRule, locale: &Locale, reading: &ClockReading) -> GreetingPeriod {
    let evening = is_evening_period(rule, locale, reading.hour12, Some(reading.meridiem))
        || is_evening_period(rule, locale, reading.hour24, None);
    if evening {
        GreetingPeriod::Evening
    } else {
        GreetingPeriod::Morning
    }
}

#[cfg(test)]
#[path = "tests/greeting_tests.rs"]
mod tests;
