use super::*;
use std::time::Duration;

use shared::domain::{DashboardField, Locale, ProfileSnapshot};

use crate::{
    fetcher::StaticFetcher,
    greeting::GreetingPeriod,
    messages::{MessageKey, StaticCatalog},
    test_support::{at, full_profile},
    DashboardStore,
};

fn catalog() -> Arc<dyn MessageCatalog> {
    let mut catalog = StaticCatalog::english_defaults();
    let de = Locale::new("de");
    catalog.insert(&de, MessageKey::GreetingAm, "Guten Morgen");
    catalog.insert(&de, MessageKey::GreetingPm, "Guten Abend");
    Arc::new(catalog)
}

#[tokio::test]
async fn mount_hydrates_then_renders_resolved_fields() {
    let container = StateContainer::new(Locale::english());
    let mut panel = GreetingPanel::mount(
        &container,
        Arc::new(StaticFetcher::new(full_profile())),
        catalog(),
        PanelOptions::default(),
    )
    .expect("mount");

    assert_eq!(panel.hydration().requested, DashboardField::ALL.to_vec());

    let before = panel.render(at(2024, 3, 18, 9, 0));
    assert!(before.full_name.is_empty());
    assert!(before.last_successful.is_none());

    panel.settled().await;
    let after = panel.render(at(2024, 3, 18, 9, 0));
    assert_eq!(after.full_name, "Ada Lovelace");
    assert!(after.last_successful.is_some());
    assert!(after.last_failed.is_some());
}

#[tokio::test]
async fn remount_with_cached_fields_fetches_nothing() {
    let container = StateContainer::new(Locale::english());
    container.seed(DEFAULT_NAMESPACE, &full_profile());

    let panel = GreetingPanel::mount(
        &container,
        Arc::new(StaticFetcher::new(ProfileSnapshot::default())),
        catalog(),
        PanelOptions::default(),
    )
    .expect("mount");

    assert!(panel.hydration().ran);
    assert!(panel.hydration().requested.is_empty());
    assert_eq!(panel.session().in_flight(), 0);
}

#[tokio::test]
async fn rerenders_never_trigger_more_fetches() {
    let container = StateContainer::new(Locale::english());
    let profile = ProfileSnapshot {
        email: None,
        ..full_profile()
    };
    container.seed(DEFAULT_NAMESPACE, &profile);

    let mut panel = GreetingPanel::mount(
        &container,
        Arc::new(StaticFetcher::new(full_profile()).with_latency(Duration::from_millis(5))),
        catalog(),
        PanelOptions::default(),
    )
    .expect("mount");
    assert_eq!(panel.hydration().requested, vec![DashboardField::Email]);

    for _ in 0..3 {
        panel.render(at(2024, 3, 18, 9, 0));
    }
    assert_eq!(panel.session().in_flight(), 1);

    panel.settled().await;
    assert_eq!(panel.session().email().as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn locale_switch_changes_greeting_and_pattern() {
    let container = StateContainer::new(Locale::english());
    container.seed(DEFAULT_NAMESPACE, &full_profile());
    let mut panel = GreetingPanel::mount(
        &container,
        Arc::new(StaticFetcher::default()),
        catalog(),
        PanelOptions {
            rule: GreetingRule::LocaleScoped,
            ..PanelOptions::default()
        },
    )
    .expect("mount");

    let english = panel.render(at(2024, 3, 18, 20, 0));
    assert_eq!(english.period, GreetingPeriod::Evening);
    assert_eq!(english.greeting, "Good evening");

    container.set_locale(Locale::new("de"));
    assert!(panel.changed().await);

    let german = panel.render(at(2024, 3, 18, 20, 0));
    assert_eq!(german.greeting, "Guten Abend");
    assert_eq!(
        german.last_successful.expect("success line").display,
        "17.03.2024, 21:03"
    );
}

#[tokio::test]
async fn display_offset_drives_greeting_period() {
    let container = StateContainer::new(Locale::new("de"));
    container.seed(DEFAULT_NAMESPACE, &full_profile());
    let mut panel = GreetingPanel::mount(
        &container,
        Arc::new(StaticFetcher::default()),
        catalog(),
        PanelOptions {
            rule: GreetingRule::LocaleScoped,
            utc_offset: FixedOffset::east_opt(2 * 3600).expect("offset"),
            ..PanelOptions::default()
        },
    )
    .expect("mount");

    // 17:30 UTC is 19:30 at +02:00
    let view = panel.render(at(2024, 6, 1, 17, 30));
    assert_eq!(view.period, GreetingPeriod::Evening);
}

#[tokio::test]
async fn two_panels_share_the_namespace() {
    let container = StateContainer::new(Locale::english());
    let panel = GreetingPanel::mount(
        &container,
        Arc::new(StaticFetcher::new(full_profile())),
        catalog(),
        PanelOptions::default(),
    )
    .expect("mount");
    panel.settled().await;

    let again = GreetingPanel::mount(
        &container,
        Arc::new(StaticFetcher::default()),
        catalog(),
        PanelOptions::default(),
    )
    .expect("second mount");
    assert!(again.hydration().requested.is_empty());
    assert_eq!(container.sessions(DEFAULT_NAMESPACE), 2);

    drop(panel);
    assert!(container.is_attached(DEFAULT_NAMESPACE));
    drop(again);
    assert!(!container.is_attached(DEFAULT_NAMESPACE));
}
