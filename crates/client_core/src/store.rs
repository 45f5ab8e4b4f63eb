use std::{collections::HashMap, sync::Arc};

use shared::{
    domain::{DashboardField, FieldState, Locale, ProfileSnapshot},
    protocol::DashboardUpdate,
};
use thiserror::Error;
use tokio::{runtime::Handle, sync::watch};
use tracing::{debug, info};

use crate::{fetcher::DashboardFetcher, session::AttachedSession};

pub const DEFAULT_NAMESPACE: &str = "dashboardPage";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no async runtime available to run fetch workflows")]
    NoRuntime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub name: FieldState,
    pub surname: FieldState,
    pub email: FieldState,
    pub last_present_logged: FieldState,
    pub last_successful_logged: FieldState,
    pub last_failed_logged: FieldState,
}

impl DashboardState {
    pub fn from_snapshot(snapshot: &ProfileSnapshot) -> Self {
        let mut state = Self::default();
        state.merge_snapshot(snapshot);
        state
    }

    /// Fills fields that hold no value and have no fetch in flight.
    pub fn merge_snapshot(&mut self, snapshot: &ProfileSnapshot) -> bool {
        let mut changed = false;
        for field in DashboardField::ALL {
            let slot = self.field_mut(field);
            if slot.is_present() || slot.is_pending() {
                continue;
            }
            if let Some(value) = snapshot.get(field) {
                *slot = FieldState::Resolved(Some(value));
                changed = true;
            }
        }
        changed
    }

    pub fn field(&self, field: DashboardField) -> &FieldState {
        match field {
            DashboardField::Name => &self.name,
            DashboardField::Surname => &self.surname,
            DashboardField::Email => &self.email,
            DashboardField::LastPresentLogged => &self.last_present_logged,
            DashboardField::LastSuccessfulLogged => &self.last_successful_logged,
            DashboardField::LastFailedLogged => &self.last_failed_logged,
        }
    }

    fn field_mut(&mut self, field: DashboardField) -> &mut FieldState {
        match field {
            DashboardField::Name => &mut self.name,
            DashboardField::Surname => &mut self.surname,
            DashboardField::Email => &mut self.email,
            DashboardField::LastPresentLogged => &mut self.last_present_logged,
            DashboardField::LastSuccessfulLogged => &mut self.last_successful_logged,
            DashboardField::LastFailedLogged => &mut self.last_failed_logged,
        }
    }

    pub fn apply(&mut self, update: &DashboardUpdate) -> bool {
        let slot = self.field_mut(update.field());
        let next = match update {
            DashboardUpdate::FieldRequested { .. } if !slot.is_present() => FieldState::Pending,
            DashboardUpdate::FieldRequested { .. } => return false,
            DashboardUpdate::FieldResolved { value, .. } => FieldState::Resolved(value.clone()),
            // a failed refresh keeps whatever value was already there
            DashboardUpdate::FieldFailed(_) if slot.is_present() => return false,
            DashboardUpdate::FieldFailed(_) => FieldState::Resolved(None),
            DashboardUpdate::FieldAbandoned { .. } if slot.is_pending() => FieldState::NotRequested,
            DashboardUpdate::FieldAbandoned { .. } => return false,
        };

        if *slot == next {
            return false;
        }
        *slot = next;
        true
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        let text = |field| {
            self.field(field)
                .value()
                .and_then(|value| value.as_text())
                .map(str::to_owned)
        };
        let at = |field| self.field(field).value().and_then(|value| value.as_timestamp());

        ProfileSnapshot {
            name: text(DashboardField::Name),
            surname: text(DashboardField::Surname),
            email: text(DashboardField::Email),
            last_present_logged: at(DashboardField::LastPresentLogged),
            last_successful_logged: at(DashboardField::LastSuccessfulLogged),
            last_failed_logged: at(DashboardField::LastFailedLogged),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContainerState {
    pub locale: Locale,
    pub slots: HashMap<String, DashboardState>,
    // live sessions per namespace
    attached: HashMap<String, usize>,
}

#[derive(Clone)]
pub struct StateContainer {
    state: Arc<watch::Sender<ContainerState>>,
}

impl StateContainer {
    pub fn new(locale: Locale) -> Self {
        let (state, _) = watch::channel(ContainerState {
            locale,
            ..ContainerState::default()
        });
        Self {
            state: Arc::new(state),
        }
    }

    pub fn locale(&self) -> Locale {
        self.state.borrow().locale.clone()
    }

    pub fn set_locale(&self, locale: Locale) {
        self.state.send_if_modified(|state| {
            if state.locale == locale {
                return false;
            }
            info!(from = %state.locale, to = %locale, "locale changed");
            state.locale = locale;
            true
        });
    }

    pub fn slot(&self, namespace: &str) -> Option<DashboardState> {
        self.state.borrow().slots.get(namespace).cloned()
    }

    pub fn field(&self, namespace: &str, field: DashboardField) -> FieldState {
        self.state
            .borrow()
            .slots
            .get(namespace)
            .map(|slot| slot.field(field).clone())
            .unwrap_or_default()
    }

    pub fn seed(&self, namespace: &str, snapshot: &ProfileSnapshot) {
        self.state.send_if_modified(|state| {
            state
                .slots
                .entry(namespace.to_string())
                .or_default()
                .merge_snapshot(snapshot)
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<ContainerState> {
        self.state.subscribe()
    }

    pub fn is_attached(&self, namespace: &str) -> bool {
        self.sessions(namespace) > 0
    }

    pub fn sessions(&self, namespace: &str) -> usize {
        self.state
            .borrow()
            .attached
            .get(namespace)
            .copied()
            .unwrap_or(0)
    }

    pub fn attach(
        &self,
        namespace: &str,
        fetcher: Arc<dyn DashboardFetcher>,
    ) -> Result<AttachedSession, StoreError> {
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;

        let mut sessions = 0;
        self.state.send_modify(|state| {
            let count = state.attached.entry(namespace.to_string()).or_insert(0);
            *count += 1;
            sessions = *count;
            state.slots.entry(namespace.to_string()).or_default();
        });

        debug!(namespace, sessions, "session attached");
        Ok(AttachedSession::new(
            self.clone(),
            namespace.to_string(),
            fetcher,
            runtime,
        ))
    }

    pub(crate) fn dispatch(&self, namespace: &str, update: &DashboardUpdate) {
        self.state.send_if_modified(|state| {
            state
                .slots
                .get_mut(namespace)
                .is_some_and(|slot| slot.apply(update))
        });
    }

    pub(crate) fn release(&self, namespace: &str) {
        let mut sessions = 0;
        self.state.send_if_modified(|state| {
            let Some(count) = state.attached.get_mut(namespace) else {
                return false;
            };
            *count -= 1;
            sessions = *count;
            if *count == 0 {
                state.attached.remove(namespace);
            }
            true
        });
        debug!(namespace, sessions, "session detached");
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
