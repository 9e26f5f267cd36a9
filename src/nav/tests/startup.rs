use crate::nav::record::NavRecord;
use crate::nav::store::{CURRENT_APP_KEY, CURRENT_PAGES_KEY, StorageBackend};
use crate::registry::{AppId, PageId};

use super::support::HostHarness;

#[test]
fn fresh_session_resolves_catalogue_defaults() {
    let harness = HostHarness::new();
    let nav = harness.navigator();

    assert_eq!(nav.current_app(), AppId(1));
    assert_eq!(nav.current_page(), PageId::from("index"));

    // Reconciliation wrote the resolved location back in place.
    let record = harness.codec.read();
    assert_eq!(record.app, Some(AppId(1)));
    assert_eq!(record.page_for(AppId(1)), Some(&PageId::from("index")));
    assert_eq!(harness.host.depth(), 1);
}

#[test]
fn stored_location_is_restored_on_startup() {
    let harness = HostHarness::new();
    harness.store.save_app(AppId(2));
    harness
        .store
        .save_page(AppId(2), &PageId::from("items"));

    let nav = harness.navigator();

    assert_eq!(nav.current_app(), AppId(2));
    assert_eq!(nav.current_page(), PageId::from("items"));
}

#[test]
fn stored_unknown_application_falls_back_to_default() {
    let harness = HostHarness::new();
    harness
        .backend
        .set(CURRENT_APP_KEY, "9")
        .expect("memory set");

    let nav = harness.navigator();
    assert_eq!(nav.current_app(), AppId(1));
}

#[test]
fn history_slot_wins_over_durable_storage() {
    let harness = HostHarness::new();
    harness.codec.replace(NavRecord::with_app(AppId(2)));
    harness.store.save_app(AppId(3));

    let nav = harness.navigator();
    assert_eq!(nav.current_app(), AppId(2));
}

#[test]
fn invalid_slot_value_is_reconciled_in_place() {
    let harness = HostHarness::new();
    harness.codec.replace(NavRecord::with_app(AppId(99)));

    let nav = harness.navigator();

    assert_eq!(nav.current_app(), AppId(1));
    assert_eq!(harness.codec.read().app, Some(AppId(1)));
    // Replace writes only: still a single history entry.
    assert_eq!(harness.host.depth(), 1);
}

#[test]
fn malformed_durable_values_are_ignored() {
    let harness = HostHarness::new();
    harness
        .backend
        .set(CURRENT_APP_KEY, "three")
        .expect("memory set");
    harness
        .backend
        .set(CURRENT_PAGES_KEY, "{ not json")
        .expect("memory set");

    let nav = harness.navigator();

    assert_eq!(nav.current_app(), AppId(1));
    assert_eq!(nav.current_page(), PageId::from("index"));
}
