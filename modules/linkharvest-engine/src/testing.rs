//! Test mocks for the harvest engine.
//!
//! One mock per trait boundary:
//! - `MockOpener` (ContextOpener) — records issue order and instants,
//!   scriptable per-URL failures
//! - `MockNotifier` (UserNotifier) — scripted confirmations and prompt
//!   answers, recorded notices
//! - `MemoryEndpointStore` (EndpointStore) — in-memory endpoint slot
//!
//! Plus helpers for building snapshots, candidate sets, and fully-wired
//! workflows/harvesters against the mocks.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use linkharvest_common::{EngineConfig, LinkCandidate};

use crate::aggregate::Harvester;
use crate::dispatch::Workflow;
use crate::fallback::{EndpointStore, RemoteFallback};
use crate::notify::UserNotifier;
use crate::opener::ContextOpener;
use crate::snapshot::{Element, PageSnapshot};

/// Canonical-looking document URL used across the test suite.
pub const DOC_URL: &str = "https://docs.example.com/document/d/abc123/edit";

// ---------------------------------------------------------------------------
// MockOpener
// ---------------------------------------------------------------------------

/// Records every open attempt with the instant it was issued. URLs in the
/// fail set return an error instead of opening.
pub struct MockOpener {
    issues: Mutex<Vec<(String, tokio::time::Instant)>>,
    opened: Mutex<Vec<String>>,
    fail_urls: HashSet<String>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self {
            issues: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
            fail_urls: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, url: &str) -> Self {
        self.fail_urls.insert(url.to_string());
        self
    }

    /// Every attempt, in issue order, with its issue instant.
    pub fn issues(&self) -> Vec<(String, tokio::time::Instant)> {
        self.issues.lock().expect("issues lock").clone()
    }

    /// Successful opens only.
    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().expect("opened lock").clone()
    }
}

impl Default for MockOpener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextOpener for MockOpener {
    async fn open(&self, url: &str) -> Result<()> {
        self.issues
            .lock()
            .expect("issues lock")
            .push((url.to_string(), tokio::time::Instant::now()));
        if self.fail_urls.contains(url) {
            bail!("scripted failure for {url}");
        }
        self.opened
            .lock()
            .expect("opened lock")
            .push(url.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockNotifier
// ---------------------------------------------------------------------------

/// Scripted notifier. Confirmations answer `false` unless configured;
/// prompts answer `None` unless configured.
pub struct MockNotifier {
    notices: Mutex<Vec<String>>,
    confirms: Mutex<Vec<String>>,
    confirm_answer: bool,
    prompt_answer: Option<String>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
            confirm_answer: false,
            prompt_answer: None,
        }
    }

    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn answering_prompt(mut self, answer: &str) -> Self {
        self.prompt_answer = Some(answer.to_string());
        self
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().expect("notices lock").clone()
    }

    pub fn confirm_count(&self) -> usize {
        self.confirms.lock().expect("confirms lock").len()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl UserNotifier for MockNotifier {
    fn notice(&self, message: &str) {
        self.notices
            .lock()
            .expect("notices lock")
            .push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms
            .lock()
            .expect("confirms lock")
            .push(message.to_string());
        self.confirm_answer
    }

    fn prompt(&self, _message: &str) -> Option<String> {
        self.prompt_answer.clone()
    }
}

// ---------------------------------------------------------------------------
// MemoryEndpointStore
// ---------------------------------------------------------------------------

pub struct MemoryEndpointStore {
    endpoint: Mutex<Option<String>>,
}

impl MemoryEndpointStore {
    pub fn new() -> Self {
        Self {
            endpoint: Mutex::new(None),
        }
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: Mutex::new(Some(endpoint.to_string())),
        }
    }
}

impl Default for MemoryEndpointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointStore for MemoryEndpointStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.endpoint.lock().expect("endpoint lock").clone())
    }

    fn save(&self, endpoint: &str) -> Result<()> {
        *self.endpoint.lock().expect("endpoint lock") = Some(endpoint.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Snapshot and candidate builders
// ---------------------------------------------------------------------------

pub fn anchor(href: &str, text: &str) -> Element {
    Element::new("a").with_attr("href", href).with_text(text)
}

/// A document content container holding `children`, marked the way the
/// host marks editor pages.
pub fn content_page(children: Vec<Element>) -> Element {
    let mut page = Element::new("div").with_attr("class", "kix-page");
    for child in children {
        page = page.with_child(child);
    }
    page
}

pub fn snapshot_with_payloads(payloads: Vec<Value>) -> PageSnapshot {
    let mut snap = PageSnapshot::new(DOC_URL);
    for payload in payloads {
        snap = snap.with_payload(payload);
    }
    snap
}

/// `n` valid candidates with predictable URLs (`https://example.com/{i}`).
pub fn candidates(n: usize) -> Vec<LinkCandidate> {
    (0..n)
        .map(|i| LinkCandidate::new(format!("https://example.com/{i}"), format!("Link {i}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Wired-up assemblies
// ---------------------------------------------------------------------------

pub fn workflow_parts(
    opener: MockOpener,
    notifier: MockNotifier,
) -> (Workflow, Arc<MockOpener>, Arc<MockNotifier>) {
    let opener = Arc::new(opener);
    let notifier = Arc::new(notifier);
    let workflow = Workflow::new(
        opener.clone(),
        notifier.clone(),
        &EngineConfig::default(),
    );
    (workflow, opener, notifier)
}

pub fn workflow_with(notifier: MockNotifier) -> (Workflow, Arc<MockOpener>, Arc<MockNotifier>) {
    workflow_parts(MockOpener::new(), notifier)
}

pub fn harvester_with_notifier(
    notifier: MockNotifier,
) -> (Harvester, Arc<MockOpener>, Arc<MockNotifier>) {
    let opener = Arc::new(MockOpener::new());
    let notifier = Arc::new(notifier);
    let fallback = RemoteFallback::new(
        Arc::new(MemoryEndpointStore::new()),
        opener.clone(),
        notifier.clone(),
    );
    let harvester = Harvester::new(&EngineConfig::default(), fallback);
    (harvester, opener, notifier)
}

pub fn harvester() -> (Harvester, Arc<MockOpener>, Arc<MockNotifier>) {
    harvester_with_notifier(MockNotifier::new())
}
