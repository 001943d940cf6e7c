//! Boundary tests — one seam handoff at a time, plus the full cycle.
//!
//! Each test follows MOCK → FUNCTION → OUTPUT: set up mocks, run one real
//! engine path, assert the output.

use std::sync::Arc;

use serde_json::json;

use crate::aggregate::Harvester;
use crate::dispatch::{DispatchOutcome, WorkflowState};
use crate::fallback::RemoteFallback;
use crate::run_log::DiscoveryLog;
use crate::snapshot::{Element, PageSnapshot, Style};
use crate::testing::*;

use linkharvest_common::EngineConfig;

/// A snapshot where every strategy has something to find, plus host chrome
/// that must be filtered out.
fn full_snapshot() -> PageSnapshot {
    let styled_run = Element::new("div")
        .with_attr("data-link-url", "https://example.com/styled")
        .with_child(
            Element::new("span")
                .with_style(Style {
                    color: Some("#1155cc".to_string()),
                    underline: false,
                })
                .with_text("Styled run"),
        );
    let a11y_label = Element::new("div")
        .with_attr("aria-label", "Open https://example.com/labeled now");
    let chrome = anchor("https://accounts.google.com/signin", "My Account");

    let page = content_page(vec![
        anchor("https://example.com/plain", "Plain anchor"),
        styled_run,
        a11y_label,
        chrome,
    ]);
    let root = Element::new("body")
        .with_child(anchor("https://example.com/toolbar", "Sign in"))
        .with_child(page);

    PageSnapshot::new(DOC_URL)
        .with_payload(json!({"refs": ["see https://example.com/embedded for background"]}))
        .with_root(root)
}

#[tokio::test]
async fn full_cycle_discovers_across_all_strategies() {
    let (harvester, _opener, _notifier) = harvester();
    let mut log = DiscoveryLog::new(DOC_URL);

    let found = harvester.discover(&full_snapshot(), &mut log).await;

    let urls: Vec<&str> = found.iter().map(|c| c.url.as_str()).collect();
    assert!(urls.contains(&"https://example.com/embedded"));
    assert!(urls.contains(&"https://example.com/styled"));
    assert!(urls.contains(&"https://example.com/labeled"));
    assert!(urls.contains(&"https://example.com/plain"));
    // Host chrome never survives the anchor filters.
    assert!(!urls.iter().any(|u| u.contains("accounts.google.com")));
    assert!(!urls.contains(&"https://example.com/toolbar"));
    // Strategy priority ordering: embedded findings precede anchor findings.
    let embedded_pos = urls
        .iter()
        .position(|u| *u == "https://example.com/embedded")
        .expect("embedded found");
    let anchor_pos = urls
        .iter()
        .position(|u| *u == "https://example.com/plain")
        .expect("anchor found");
    assert!(embedded_pos < anchor_pos);
}

#[tokio::test(start_paused = true)]
async fn discover_present_dispatch_roundtrip() {
    let (harvester, _h_opener, _h_notifier) = harvester();
    let (mut workflow, opener, notifier) = workflow_with(MockNotifier::new());
    let mut log = DiscoveryLog::new(DOC_URL);

    let found = harvester.discover(&full_snapshot(), &mut log).await;
    let total = found.len();
    assert!(workflow.present(found, &mut log));
    assert!(notifier
        .notices()
        .iter()
        .any(|n| n.starts_with(&format!("Found {total} links"))));

    workflow.clear_all();
    workflow.toggle(0);
    let outcome = workflow.open_selected(&mut log).await.expect("dispatch");

    assert!(matches!(outcome, DispatchOutcome::Completed(_)));
    assert_eq!(opener.opened_urls().len(), 1);
    assert_eq!(workflow.state(), WorkflowState::Idle);
    // The timeline saw strategies, presentation, and dispatch.
    assert!(log.event_count() >= 6);
}

#[tokio::test]
async fn persisted_endpoint_is_reused_without_prompting() {
    // Confirmation granted but no prompt answer scripted: the handoff can
    // only succeed by reusing the stored endpoint.
    let opener = Arc::new(MockOpener::new());
    let notifier = Arc::new(MockNotifier::new().confirming(true));
    let fallback = RemoteFallback::new(
        Arc::new(MemoryEndpointStore::with_endpoint(
            "https://service.example.com/exec",
        )),
        opener.clone(),
        notifier.clone(),
    );
    let harvester = Harvester::new(&EngineConfig::default(), fallback);
    let mut log = DiscoveryLog::new(DOC_URL);

    let found = harvester
        .discover(&PageSnapshot::new(DOC_URL), &mut log)
        .await;

    assert!(found.is_empty());
    assert_eq!(opener.opened_urls().len(), 1);
    assert!(opener.opened_urls()[0].starts_with("https://service.example.com/exec?docUrl="));
}

#[tokio::test]
async fn empty_document_reports_no_links_exactly_once() {
    let (harvester, _h_opener, _h_notifier) = harvester();
    let (mut workflow, opener, notifier) = workflow_with(MockNotifier::new());
    let mut log = DiscoveryLog::new(DOC_URL);

    let found = harvester
        .discover(&PageSnapshot::new(DOC_URL), &mut log)
        .await;
    let presented = workflow.present(found, &mut log);

    assert!(!presented);
    assert_eq!(workflow.state(), WorkflowState::Idle);
    assert!(opener.opened_urls().is_empty());
    let no_links = notifier
        .notices()
        .iter()
        .filter(|n| n.contains("No links found"))
        .count();
    assert_eq!(no_links, 1);
}
