mod common;

use common::{Harness, PROFILE_URL, wait_until};
use popdeck_core::gateway::{ContentResponse, InboundMessage};
use popdeck_core::{ActionOutcome, ActionPhase, EditMode, Error, PanelId, PanelRegistry, PanelShell};
use popdeck_core::status::StatusFeedConfig;

#[tokio::test]
async fn test_shell_starts_on_first_panel() {
    let h = Harness::new();
    let shell = h.shell();

    assert_eq!(shell.active(), PanelId::ProfileSaver);
    let nav = shell.navigation();
    assert_eq!(nav.len(), 6);
    assert_eq!(nav.iter().filter(|item| item.active).count(), 1);
    assert!(nav[0].active);
}

#[tokio::test]
async fn test_exactly_one_panel_is_active_after_every_switch() {
    let h = Harness::new();
    let mut shell = h.shell();

    for id in PanelId::ALL.iter().rev() {
        shell.select(*id).unwrap();
        let active: Vec<_> = shell
            .navigation()
            .into_iter()
            .filter(|item| item.active)
            .map(|item| item.id)
            .collect();
        assert_eq!(active, vec![*id]);
        assert_eq!(shell.active_view().spec().id, *id);
    }
}

#[tokio::test]
async fn test_selecting_active_panel_keeps_state() {
    let h = Harness::new();
    let mut shell = h.shell();
    shell.dispatch(&InboundMessage::new("profileData", "Jane Doe"));

    assert!(!shell.select(PanelId::ProfileSaver).unwrap());
    assert_eq!(shell.active_view().text(), "Jane Doe");
}

#[tokio::test]
async fn test_switching_resets_panel_state() {
    let h = Harness::new();
    let mut shell = h.shell();
    shell.dispatch(&InboundMessage::new("profileData", "Jane Doe"));
    shell.active_view().toggle_edit();
    assert!(!shell.active_view().feed().is_empty());

    assert!(shell.select(PanelId::AutoScroll).unwrap());
    assert!(shell.select(PanelId::ProfileSaver).unwrap());

    let view = shell.snapshot();
    assert_eq!(view.panel.text, "");
    assert_eq!(view.panel.edit_mode, EditMode::ReadOnly);
    assert!(view.statuses.is_empty());
}

#[tokio::test]
async fn test_select_outside_registry_is_rejected() {
    let h = Harness::new();
    let registry = PanelRegistry::with_panels(&[PanelId::AutoScroll, PanelId::SmartLinkSaver]).unwrap();
    let mut shell = PanelShell::new(
        registry,
        h.gateway.clone(),
        h.tracker.clone(),
        StatusFeedConfig::default(),
    );

    assert_eq!(shell.active(), PanelId::AutoScroll);
    let err = shell.select(PanelId::ProfileSaver).unwrap_err();
    assert!(matches!(err, Error::UnknownPanel(_)));
    assert_eq!(shell.active(), PanelId::AutoScroll);
}

#[tokio::test]
async fn test_dispatch_only_reaches_mounted_panel() {
    let h = Harness::new();
    let mut shell = h.shell();
    shell.select(PanelId::SmartLinkSaver).unwrap();

    assert!(!shell.dispatch(&InboundMessage::new("profileData", "Jane")));
    assert!(shell.dispatch(&InboundMessage::new("linkSaved", "https://a.example")));
    assert_eq!(shell.snapshot().panel.text, "https://a.example");
}

#[tokio::test]
async fn test_snapshot_reflects_busy_action_and_tab() {
    let h = Harness::new();
    h.on_tab(PROFILE_URL).await;
    let reply = h.tabs.reply_later();
    let shell = h.shell();

    let panel = shell.active_view().clone();
    let running = tokio::spawn(async move { panel.trigger("scrape").await });
    wait_until(|| !h.tabs.sent().is_empty()).await;

    let view = shell.snapshot();
    let scrape = view.panel.actions.iter().find(|a| a.id == "scrape").unwrap();
    assert_eq!(scrape.phase, ActionPhase::Busy);
    assert_eq!(view.tab.unwrap().url.as_deref(), Some(PROFILE_URL));

    reply.send(Ok(ContentResponse::success(Some("Jane".to_string())))).unwrap();
    running.await.unwrap().unwrap();

    let view = shell.snapshot();
    assert!(view.panel.actions.iter().all(|a| a.phase == ActionPhase::Idle));
    assert_eq!(view.panel.text, "Jane");
    assert_eq!(view.statuses.len(), 1);
}

#[tokio::test]
async fn test_switch_discards_in_flight_result() {
    let h = Harness::new();
    h.on_tab(PROFILE_URL).await;
    let reply = h.tabs.reply_later();
    let mut shell = h.shell();

    let panel = shell.active_view().clone();
    let running = tokio::spawn(async move { panel.trigger("scrape").await });
    wait_until(|| !h.tabs.sent().is_empty()).await;

    shell.select(PanelId::AutoScroll).unwrap();
    shell.select(PanelId::ProfileSaver).unwrap();
    reply.send(Ok(ContentResponse::success(Some("late".to_string())))).unwrap();

    assert_eq!(running.await.unwrap().unwrap(), ActionOutcome::Discarded);
    assert_eq!(shell.snapshot().panel.text, "");
    assert!(shell.active_view().feed().is_empty());
}

#[tokio::test]
async fn test_scrape_on_wrong_site_after_selecting_profile_saver() {
    let h = Harness::new();
    h.on_tab("https://example.com").await;
    let mut shell = h.shell();
    shell.select(PanelId::SmartLinkSaver).unwrap();
    shell.select(PanelId::ProfileSaver).unwrap();

    let outcome = shell.active_view().trigger("scrape").await.unwrap();

    assert!(!outcome.is_success());
    let view = shell.snapshot();
    assert_eq!(view.panel.text, "");
    assert_eq!(
        view.statuses.iter().map(|s| s.text.as_str()).collect::<Vec<_>>(),
        vec!["Error: Please navigate to a LinkedIn profile page"]
    );
    assert!(h.tabs.sent().is_empty());
}
