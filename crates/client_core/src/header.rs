use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::Locale;

use crate::{
    format::TimestampFormatter,
    greeting::{classify, ClockReading, GreetingPeriod, GreetingRule},
    messages::{MessageCatalog, MessageKey},
    DashboardStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginLine {
    pub label: String,
    pub at: DateTime<Utc>,
    pub display: String,
}

impl fmt::Display for LoginLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.display)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub locale: Locale,
    pub period: GreetingPeriod,
    pub greeting: String,
    pub full_name: String,
    pub last_successful: Option<LoginLine>,
    pub last_failed: Option<LoginLine>,
}

impl fmt::Display for HeaderView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.full_name.is_empty() {
            write!(f, "{}", self.greeting)?;
        } else {
            write!(f, "{}, {}", self.greeting, self.full_name)?;
        }
        if let Some(line) = &self.last_successful {
            write!(f, "\n{line}")?;
        }
        if let Some(line) = &self.last_failed {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}

pub fn render_header<S: DashboardStore + ?Sized>(
    store: &S,
    catalog: &dyn MessageCatalog,
    formatter: &TimestampFormatter,
    rule: GreetingRule,
    now: DateTime<Utc>,
) -> HeaderView {
    let locale = store.locale();
    let reading = ClockReading::from_time(&formatter.localize(now));
    let period = classify(rule, &locale, &reading);

    let full_name = [store.name(), store.surname()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    let login_line = |key: MessageKey, at: DateTime<Utc>| LoginLine {
        label: catalog.resolve(&locale, key),
        at,
        display: formatter.format(at, &locale),
    };

    let last_successful = store
        .last_successful_logged()
        .or_else(|| store.last_present_logged())
        .map(|at| login_line(MessageKey::LastSuccessfulLoginInformation, at));
    let last_failed = store
        .last_failed_logged()
        .map(|at| login_line(MessageKey::LastFailedLoginInformation, at));

    HeaderView {
        greeting: catalog.resolve(&locale, period.message_key()),
        locale,
        period,
        full_name,
        last_successful,
        last_failed,
    }
}

#[cfg(test)]
#[path = "tests/header_tests.rs"]
mod tests;
