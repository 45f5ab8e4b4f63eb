use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use shared::{
    domain::{DashboardField, FieldState, FieldValue, Locale},
    error::{ErrorCode, FetchError},
    protocol::DashboardUpdate,
};
use tokio::{
    runtime::Handle,
    task::{AbortHandle, JoinHandle},
};
use tracing::{debug, warn};

use crate::{fetcher::DashboardFetcher, store::StateContainer, DashboardStore};

struct InFlightFetch {
    field: DashboardField,
    abort: AbortHandle,
    // taken by `settled`; the abort handle stays until the task finishes
    join: Option<JoinHandle<()>>,
}

pub struct AttachedSession {
    container: StateContainer,
    namespace: String,
    fetcher: Arc<dyn DashboardFetcher>,
    runtime: Handle,
    in_flight: Mutex<Vec<InFlightFetch>>,
}

impl AttachedSession {
    pub(crate) fn new(
        container: StateContainer,
        namespace: String,
        fetcher: Arc<dyn DashboardFetcher>,
        runtime: Handle,
    ) -> Self {
        Self {
            container,
            namespace,
            fetcher,
            runtime,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn container(&self) -> &StateContainer {
        &self.container
    }

    pub fn in_flight(&self) -> usize {
        self.lock_in_flight()
            .iter()
            .filter(|fetch| !fetch.abort.is_finished())
            .count()
    }

    /// Cancel-safe: fetches stay tracked until they finish.
    pub async fn settled(&self) {
        let pending: Vec<_> = self
            .lock_in_flight()
            .iter_mut()
            .filter_map(|fetch| fetch.join.take())
            .collect();

        if !pending.is_empty() {
            for result in join_all(pending).await {
                if let Err(err) = result {
                    if err.is_panic() {
                        warn!(namespace = %self.namespace, "fetch task panicked: {err}");
                    }
                }
            }
        }

        self.lock_in_flight()
            .retain(|fetch| !fetch.abort.is_finished());
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Vec<InFlightFetch>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_shape(
    field: DashboardField,
    value: Option<FieldValue>,
) -> Result<Option<FieldValue>, FetchError> {
    match &value {
        Some(FieldValue::Text(_)) if field.is_timestamp() => Err(FetchError::new(
            field,
            ErrorCode::Malformed,
            "expected a timestamp, got text",
        )),
        Some(FieldValue::Timestamp(_)) if !field.is_timestamp() => Err(FetchError::new(
            field,
            ErrorCode::Malformed,
            "expected text, got a timestamp",
        )),
        _ => Ok(value),
    }
}

impl DashboardStore for AttachedSession {
    fn field(&self, field: DashboardField) -> FieldState {
        self.container.field(&self.namespace, field)
    }

    fn locale(&self) -> Locale {
        self.container.locale()
    }

    fn request(&self, field: DashboardField) {
        self.container
            .dispatch(&self.namespace, &DashboardUpdate::FieldRequested { field });
        debug!(
            namespace = %self.namespace,
            field = %field,
            action = field.action_name(),
            "fetch dispatched"
        );

        let container = self.container.clone();
        let namespace = self.namespace.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let handle = self.runtime.spawn(async move {
            let outcome = fetcher
                .fetch(field)
                .await
                .and_then(|value| check_shape(field, value));
            let update = match outcome {
                Ok(value) => {
                    debug!(namespace = %namespace, field = %field, present = value.is_some(), "fetch resolved");
                    DashboardUpdate::FieldResolved { field, value }
                }
                Err(err) => {
                    warn!(namespace = %namespace, field = %field, "fetch failed, field stays empty: {err}");
                    DashboardUpdate::FieldFailed(err)
                }
            };
            container.dispatch(&namespace, &update);
        });

        let mut in_flight = self.lock_in_flight();
        in_flight.retain(|fetch| !fetch.abort.is_finished());
        in_flight.push(InFlightFetch {
            field,
            abort: handle.abort_handle(),
            join: Some(handle),
        });
    }
}

impl Drop for AttachedSession {
    fn drop(&mut self) {
        let in_flight: Vec<_> = self.lock_in_flight().drain(..).collect();
        for fetch in in_flight {
            if fetch.abort.is_finished() {
                continue;
            }
            fetch.abort.abort();
            self.container.dispatch(
                &self.namespace,
                &DashboardUpdate::FieldAbandoned { field: fetch.field },
            );
            debug!(namespace = %self.namespace, field = %fetch.field, "in-flight fetch aborted");
        }
        self.container.release(&self.namespace);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
