use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use shared::{
    domain::{DashboardField, FieldState, Locale, ProfileSnapshot},
    protocol::DashboardUpdate,
};

use crate::{store::DashboardState, DashboardStore};

pub(crate) fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn full_profile() -> ProfileSnapshot {
    ProfileSnapshot {
        name: Some("Ada".to_string()),
        surname: Some("Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        last_present_logged: Some(at(2024, 3, 18, 8, 30)),
        last_successful_logged: Some(at(2024, 3, 17, 21, 45)),
        last_failed_logged: Some(at(2024, 3, 16, 6, 5)),
    }
}

pub(crate) struct RecordingStore {
    state: Mutex<DashboardState>,
    locale: Locale,
    requests: Mutex<Vec<DashboardField>>,
}

impl RecordingStore {
    pub(crate) fn new(snapshot: &ProfileSnapshot, locale: &str) -> Self {
        Self {
            state: Mutex::new(DashboardState::from_snapshot(snapshot)),
            locale: Locale::new(locale),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<DashboardField> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl DashboardStore for RecordingStore {
    fn field(&self, field: DashboardField) -> FieldState {
        self.state.lock().expect("state lock").field(field).clone()
    }

    fn locale(&self) -> Locale {
        self.locale.clone()
    }

    fn request(&self, field: DashboardField) {
        self.requests.lock().expect("requests lock").push(field);
        self.state
            .lock()
            .expect("state lock")
            .apply(&DashboardUpdate::FieldRequested { field });
    }
}
