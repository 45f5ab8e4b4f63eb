use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use tokio::sync::watch;
use tracing::info;

use crate::{
    fetcher::DashboardFetcher,
    format::TimestampFormatter,
    greeting::GreetingRule,
    header::{render_header, HeaderView},
    hydration::{HydrationCoordinator, HydrationReport},
    messages::MessageCatalog,
    session::AttachedSession,
    store::{ContainerState, StateContainer, StoreError, DEFAULT_NAMESPACE},
};

#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub namespace: String,
    pub rule: GreetingRule,
    pub utc_offset: FixedOffset,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            rule: GreetingRule::default(),
            utc_offset: Utc.fix(),
        }
    }
}

pub struct GreetingPanel {
    session: AttachedSession,
    coordinator: HydrationCoordinator,
    hydration: HydrationReport,
    catalog: Arc<dyn MessageCatalog>,
    formatter: TimestampFormatter,
    rule: GreetingRule,
    changes: watch::Receiver<ContainerState>,
}

impl GreetingPanel {
    pub fn mount(
        container: &StateContainer,
        fetcher: Arc<dyn DashboardFetcher>,
        catalog: Arc<dyn MessageCatalog>,
        options: PanelOptions,
    ) -> Result<Self, StoreError> {
        let changes = container.subscribe();
        let session = container.attach(&options.namespace, fetcher)?;

        let mut coordinator = HydrationCoordinator::new();
        let hydration = coordinator.on_mount(&session);
        info!(
            namespace = %options.namespace,
            requested = ?hydration.requested,
            rule = %options.rule,
            "greeting panel mounted"
        );

        Ok(Self {
            session,
            coordinator,
            hydration,
            catalog,
            formatter: TimestampFormatter::new(options.utc_offset),
            rule: options.rule,
            changes,
        })
    }

    pub fn session(&self) -> &AttachedSession {
        &self.session
    }

    pub fn hydration(&self) -> &HydrationReport {
        &self.hydration
    }

    pub fn render(&mut self, now: DateTime<Utc>) -> HeaderView {
        // no-op after the first mount
        self.coordinator.on_mount(&self.session);

        drop(self.changes.borrow_and_update());
        render_header(
            &self.session,
            self.catalog.as_ref(),
            &self.formatter,
            self.rule,
            now,
        )
    }

    pub async fn changed(&mut self) -> bool {
        self.changes.changed().await.is_ok()
    }

    pub async fn settled(&self) {
        self.session.settled().await;
    }
}

#[cfg(test)]
#[path = "tests/panel_tests.rs"]
mod tests;
