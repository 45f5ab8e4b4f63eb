use super::*;
use std::time::Duration;

use async_trait::async_trait;
use shared::domain::ProfileSnapshot;

use crate::{
    fetcher::{MissingFetcher, StaticFetcher},
    store::DEFAULT_NAMESPACE,
    test_support::{at, full_profile},
};

struct WrongShapeFetcher;

#[async_trait]
impl DashboardFetcher for WrongShapeFetcher {
    async fn fetch(&self, field: DashboardField) -> Result<Option<FieldValue>, FetchError> {
        if field.is_timestamp() {
            Ok(Some(FieldValue::Text("yesterday".to_string())))
        } else {
            Ok(Some(FieldValue::Timestamp(at(2024, 1, 1, 0, 0))))
        }
    }
}

fn attach(container: &StateContainer, fetcher: impl DashboardFetcher + 'static) -> AttachedSession {
    container
        .attach(DEFAULT_NAMESPACE, Arc::new(fetcher))
        .expect("attach")
}

#[tokio::test]
async fn requested_field_resolves_into_the_slot() {
    let container = StateContainer::new(Locale::english());
    let session = attach(&container, StaticFetcher::new(full_profile()));

    session.request(DashboardField::Name);
    assert!(session.field(DashboardField::Name).is_pending());

    session.settled().await;
    assert_eq!(session.name().as_deref(), Some("Ada"));
    assert_eq!(session.in_flight(), 0);
}

#[tokio::test]
async fn missing_backend_value_resolves_empty() {
    let container = StateContainer::new(Locale::english());
    let session = attach(&container, StaticFetcher::new(ProfileSnapshot::default()));

    session.request(DashboardField::LastFailedLogged);
    session.settled().await;

    assert_eq!(
        session.field(DashboardField::LastFailedLogged),
        FieldState::Resolved(None)
    );
    assert!(session.last_failed_logged().is_none());
}

#[tokio::test]
async fn failed_fetch_leaves_field_absent_without_retry() {
    let container = StateContainer::new(Locale::english());
    let session = attach(&container, MissingFetcher);

    for field in DashboardField::ALL {
        session.request(field);
    }
    session.settled().await;

    for field in DashboardField::ALL {
        assert_eq!(session.field(field), FieldState::Resolved(None));
    }
    assert_eq!(session.in_flight(), 0);
}

#[tokio::test]
async fn mismatched_value_shape_is_rejected() {
    let container = StateContainer::new(Locale::english());
    let session = attach(&container, WrongShapeFetcher);

    session.request(DashboardField::LastPresentLogged);
    session.request(DashboardField::Surname);
    session.settled().await;

    assert!(session.last_present_logged().is_none());
    assert!(session.surname().is_none());
}

#[tokio::test]
async fn fetches_resolve_independently() {
    let container = StateContainer::new(Locale::english());
    let session = attach(
        &container,
        StaticFetcher::new(full_profile()).with_failure(DashboardField::Email),
    );

    for field in DashboardField::ALL {
        session.request(field);
    }
    session.settled().await;

    let snapshot = container
        .slot(DEFAULT_NAMESPACE)
        .expect("slot")
        .snapshot();
    assert_eq!(
        snapshot,
        ProfileSnapshot {
            email: None,
            ..full_profile()
        }
    );
}

#[tokio::test]
async fn detaching_aborts_in_flight_fetches() {
    let container = StateContainer::new(Locale::english());
    let session = attach(
        &container,
        StaticFetcher::new(full_profile()).with_latency(Duration::from_secs(60)),
    );

    session.request(DashboardField::Name);
    session.request(DashboardField::Surname);
    assert_eq!(session.in_flight(), 2);

    drop(session);

    assert!(!container.is_attached(DEFAULT_NAMESPACE));
    assert_eq!(
        container.field(DEFAULT_NAMESPACE, DashboardField::Name),
        FieldState::NotRequested
    );
    assert_eq!(
        container.field(DEFAULT_NAMESPACE, DashboardField::Surname),
        FieldState::NotRequested
    );
}

#[tokio::test]
async fn cancelled_settle_still_lets_detach_abort_fetches() {
    let container = StateContainer::new(Locale::english());
    let session = attach(
        &container,
        StaticFetcher::new(full_profile()).with_latency(Duration::from_secs(60)),
    );

    session.request(DashboardField::Name);
    let waited = tokio::time::timeout(Duration::from_millis(10), session.settled()).await;
    assert!(waited.is_err());
    assert_eq!(session.in_flight(), 1);

    drop(session);
    tokio::task::yield_now().await;

    assert!(!container.is_attached(DEFAULT_NAMESPACE));
    assert_eq!(
        container.field(DEFAULT_NAMESPACE, DashboardField::Name),
        FieldState::NotRequested
    );
}

#[tokio::test]
async fn resolved_values_outlive_the_session() {
    let container = StateContainer::new(Locale::english());
    let session = attach(&container, StaticFetcher::new(full_profile()));

    session.request(DashboardField::Email);
    session.settled().await;
    drop(session);

    assert!(container
        .field(DEFAULT_NAMESPACE, DashboardField::Email)
        .is_present());
}
