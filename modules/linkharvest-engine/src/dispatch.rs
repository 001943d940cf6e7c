//! Selection & dispatch workflow — one state machine per discovery cycle.
//!
//! `Idle → Presented → (selecting)* → Dispatching → Idle`. Selection
//! operations repeat arbitrarily without leaving `Presented`. Dispatch
//! issues opens in order with a cumulative stagger so a burst of context
//! creations never looks like popup abuse, then reports opened/attempted.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use linkharvest_common::{EngineConfig, LinkCandidate};
use tracing::{info, warn};

use crate::notify::UserNotifier;
use crate::opener::ContextOpener;
use crate::run_log::{DiscoveryLog, EventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Presented,
    Dispatching,
}

/// Transient per-candidate checked flags, keyed by position in the
/// presented collection. Discarded with the cycle.
#[derive(Debug, Clone)]
pub struct SelectionState {
    checked: Vec<bool>,
}

impl SelectionState {
    /// Initial checked state per candidate equals its validity.
    fn from_candidates(candidates: &[LinkCandidate]) -> Self {
        Self {
            checked: candidates.iter().map(|c| c.is_valid).collect(),
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(flag) = self.checked.get_mut(index) {
            *flag = !*flag;
        }
    }

    pub fn set(&mut self, index: usize, value: bool) {
        if let Some(flag) = self.checked.get_mut(index) {
            *flag = value;
        }
    }

    pub fn select_all(&mut self) {
        self.checked.fill(true);
    }

    pub fn clear_all(&mut self) {
        self.checked.fill(false);
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    pub fn checked_count(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }
}

/// The presented collection plus its selection projection.
pub struct Presentation {
    pub candidates: Vec<LinkCandidate>,
    pub selection: SelectionState,
}

impl Presentation {
    fn new(candidates: Vec<LinkCandidate>) -> Self {
        let selection = SelectionState::from_candidates(&candidates);
        Self {
            candidates,
            selection,
        }
    }

    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    pub fn valid_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_valid).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub attempted: usize,
    pub opened: usize,
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opened {} out of {} links.", self.opened, self.attempted)
    }
}

/// How a dispatch request resolved. The first two are normal control flow,
/// not errors: the workflow stays in `Presented`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing was chosen; nothing was opened.
    EmptySelection,
    /// The user declined the bulk-open confirmation.
    Declined,
    /// Dispatch ran to completion.
    Completed(DispatchReport),
}

pub struct Workflow {
    opener: Arc<dyn ContextOpener>,
    notifier: Arc<dyn UserNotifier>,
    stagger: Duration,
    summary_delay: Duration,
    bulk_threshold: usize,
    state: WorkflowState,
    presented: Option<Presentation>,
}

impl Workflow {
    pub fn new(
        opener: Arc<dyn ContextOpener>,
        notifier: Arc<dyn UserNotifier>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            opener,
            notifier,
            stagger: config.stagger,
            summary_delay: config.summary_delay,
            bulk_threshold: config.bulk_open_threshold,
            state: WorkflowState::Idle,
            presented: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn presentation(&self) -> Option<&Presentation> {
        self.presented.as_ref()
    }

    /// Present a completed discovery result. An empty result reports
    /// "no links found" and stays `Idle`; a new presentation discards any
    /// prior cycle's state. Returns whether anything was presented.
    pub fn present(&mut self, candidates: Vec<LinkCandidate>, log: &mut DiscoveryLog) -> bool {
        if candidates.is_empty() {
            self.notifier.notice("No links found in this document.");
            self.state = WorkflowState::Idle;
            self.presented = None;
            return false;
        }

        let presentation = Presentation::new(candidates);
        self.notifier.notice(&format!(
            "Found {} links ({} valid).",
            presentation.total(),
            presentation.valid_count()
        ));
        log.record(EventKind::Presented {
            total: presentation.total() as u32,
            valid: presentation.valid_count() as u32,
        });
        self.presented = Some(presentation);
        self.state = WorkflowState::Presented;
        true
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(p) = self.presented.as_mut() {
            p.selection.toggle(index);
        }
    }

    pub fn select_all(&mut self) {
        if let Some(p) = self.presented.as_mut() {
            p.selection.select_all();
        }
    }

    pub fn clear_all(&mut self) {
        if let Some(p) = self.presented.as_mut() {
            p.selection.clear_all();
        }
    }

    /// Dispatch exactly the valid candidates, ignoring checkbox state.
    pub async fn open_all_valid(&mut self, log: &mut DiscoveryLog) -> Result<DispatchOutcome> {
        let chosen = match self.presented.as_ref() {
            Some(p) => p
                .candidates
                .iter()
                .filter(|c| c.is_valid)
                .map(|c| c.url.clone())
                .collect(),
            None => Vec::new(),
        };
        self.dispatch(chosen, log).await
    }

    /// Dispatch exactly the checked candidates.
    pub async fn open_selected(&mut self, log: &mut DiscoveryLog) -> Result<DispatchOutcome> {
        let chosen = match self.presented.as_ref() {
            Some(p) => p
                .candidates
                .iter()
                .enumerate()
                .filter(|(i, _)| p.selection.is_checked(*i))
                .map(|(_, c)| c.url.clone())
                .collect(),
            None => Vec::new(),
        };
        self.dispatch(chosen, log).await
    }

    async fn dispatch(
        &mut self,
        urls: Vec<String>,
        log: &mut DiscoveryLog,
    ) -> Result<DispatchOutcome> {
        if urls.is_empty() {
            self.notifier.notice("No links selected.");
            return Ok(DispatchOutcome::EmptySelection);
        }

        if urls.len() > self.bulk_threshold {
            let accepted = self
                .notifier
                .confirm(&format!("Open {} links at once?", urls.len()));
            if !accepted {
                info!(chosen = urls.len(), "Bulk open declined");
                return Ok(DispatchOutcome::Declined);
            }
        }

        self.state = WorkflowState::Dispatching;
        let attempted = urls.len();
        log.record(EventKind::DispatchStarted {
            chosen: attempted as u32,
        });

        // Issue order is guaranteed; completion order is not. Each open is
        // an independently-scheduled task, and a failed open never blocks
        // the rest of the sequence.
        let stagger_ms = self.stagger.as_millis() as u64;
        let mut handles = Vec::with_capacity(attempted);
        for (i, url) in urls.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.stagger).await;
            }
            log.record(EventKind::DispatchIssued {
                url: url.clone(),
                offset_ms: i as u64 * stagger_ms,
            });
            let opener = Arc::clone(&self.opener);
            let url = url.clone();
            handles.push(tokio::spawn(async move {
                match opener.open(&url).await {
                    Ok(()) => true,
                    Err(error) => {
                        warn!(url = url.as_str(), error = %error, "Failed to open link");
                        false
                    }
                }
            }));
        }

        tokio::time::sleep(self.summary_delay).await;

        let results = futures::future::join_all(handles).await;
        let mut opened = 0;
        for (url, joined) in urls.iter().zip(results) {
            if joined.unwrap_or(false) {
                opened += 1;
            } else {
                log.record(EventKind::OpenFailed { url: url.clone() });
            }
        }

        let report = DispatchReport { attempted, opened };
        log.record(EventKind::SummaryReported {
            opened: opened as u32,
            attempted: attempted as u32,
        });
        self.notifier.notice(&report.to_string());
        info!(opened, attempted, "Dispatch complete");

        self.state = WorkflowState::Idle;
        self.presented = None;
        Ok(DispatchOutcome::Completed(report))
    }
}
