use chrono::{DateTime, Utc};
use shared::domain::{DashboardField, FieldState, Locale};

pub mod fetcher;
pub mod format;
pub mod greeting;
pub mod header;
pub mod hydration;
pub mod messages;
pub mod panel;
pub mod session;
pub mod store;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use fetcher::{DashboardFetcher, MissingFetcher, StaticFetcher};
pub use greeting::{classify, is_evening_period, ClockReading, GreetingPeriod, GreetingRule};
pub use header::{render_header, HeaderView, LoginLine};
pub use hydration::{HydrationCoordinator, HydrationReport};
pub use messages::{MessageCatalog, MessageKey, StaticCatalog};
pub use panel::{GreetingPanel, PanelOptions};
pub use session::AttachedSession;
pub use store::{DashboardState, StateContainer, StoreError, DEFAULT_NAMESPACE};

pub trait DashboardStore: Send + Sync {
    fn field(&self, field: DashboardField) -> FieldState;
    fn locale(&self) -> Locale;
    fn request(&self, field: DashboardField);

    fn is_present(&self, field: DashboardField) -> bool {
        self.field(field).is_present()
    }

    fn text(&self, field: DashboardField) -> Option<String> {
        self.field(field)
            .value()
            .and_then(|value| value.as_text())
            .map(str::to_owned)
    }

    fn timestamp(&self, field: DashboardField) -> Option<DateTime<Utc>> {
        self.field(field)
            .value()
            .and_then(|value| value.as_timestamp())
    }

    fn name(&self) -> Option<String> {
        self.text(DashboardField::Name)
    }

    fn surname(&self) -> Option<String> {
        self.text(DashboardField::Surname)
    }

    fn email(&self) -> Option<String> {
        self.text(DashboardField::Email)
    }

    fn last_present_logged(&self) -> Option<DateTime<Utc>> {
        self.timestamp(DashboardField::LastPresentLogged)
    }

    fn last_successful_logged(&self) -> Option<DateTime<Utc>> {
        self.timestamp(DashboardField::LastSuccessfulLogged)
    }

    fn last_failed_logged(&self) -> Option<DateTime<Utc>> {
        self.timestamp(DashboardField::LastFailedLogged)
    }
}
