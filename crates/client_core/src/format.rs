use chrono::{DateTime, Datelike, FixedOffset, Offset, TimeZone, Timelike, Utc};
use shared::domain::Locale;

pub const PATTERN_24H: &str = "DD.MM.YYYY, HH:MM";
pub const PATTERN_12H: &str = "DD.MM.YYYY, hh:MM A";

const TOKENS: &[&str] = &["YYYY", "DD", "MM", "HH", "hh", "mm", "A"];

pub fn pattern_for(locale: &Locale) -> &'static str {
    if locale.is_english() {
        PATTERN_12H
    } else {
        PATTERN_24H
    }
}

pub fn format_with_pattern<Tz: TimeZone>(at: &DateTime<Tz>, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut rest = pattern;

    while !rest.is_empty() {
        if let Some(token) = TOKENS.iter().find(|token| rest.starts_with(**token)) {
            push_token(&mut out, token, at);
            rest = &rest[token.len()..];
            continue;
        }

        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }

    out
}

fn push_token<Tz: TimeZone>(out: &mut String, token: &str, at: &DateTime<Tz>) {
    let rendered = match token {
        "YYYY" => format!("{:04}", at.year()),
        "DD" => format!("{:02}", at.day()),
        "MM" => format!("{:02}", at.month()),
        "HH" => format!("{:02}", at.hour()),
        "hh" => format!("{:02}", at.hour12().1),
        "mm" => format!("{:02}", at.minute()),
        "A" => {
            if at.hour12().0 {
                "PM".to_string()
            } else {
                "AM".to_string()
            }
        }
        other => other.to_string(),
    };
    out.push_str(&rendered);
}

#[derive(Debug, Clone, Copy)]
pub struct TimestampFormatter {
    offset: FixedOffset,
}

impl TimestampFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn localize(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.offset)
    }

    pub fn format(&self, at: DateTime<Utc>, locale: &Locale) -> String {
        format_with_pattern(&self.localize(at), pattern_for(locale))
    }
}

impl Default for TimestampFormatter {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
