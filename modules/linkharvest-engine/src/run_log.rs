//! Discovery log — JSON timeline of one discovery cycle.
//!
//! Each cycle produces a single `{data_dir}/harvest-runs/{cycle_id}.json`
//! file containing an ordered list of events with timestamps: what each
//! strategy found, what dedup discarded, and how dispatch went.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

pub struct DiscoveryLog {
    pub cycle_id: Uuid,
    pub document_url: String,
    pub started_at: DateTime<Utc>,
    events: Vec<CycleEvent>,
    seq: u32,
}

#[derive(Serialize)]
struct CycleEvent {
    seq: u32,
    ts: DateTime<Utc>,
    #[serde(flatten)]
    kind: EventKind,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    StrategyRan {
        strategy: String,
        candidates: u32,
    },
    DuplicatesDiscarded {
        count: u32,
    },
    FallbackOffered {
        accepted: bool,
    },
    Presented {
        total: u32,
        valid: u32,
    },
    DispatchStarted {
        chosen: u32,
    },
    DispatchIssued {
        url: String,
        offset_ms: u64,
    },
    OpenFailed {
        url: String,
    },
    SummaryReported {
        opened: u32,
        attempted: u32,
    },
}

#[derive(Serialize)]
struct PersistedLog<'a> {
    cycle_id: Uuid,
    document_url: &'a str,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    events: &'a [CycleEvent],
}

impl DiscoveryLog {
    pub fn new(document_url: impl Into<String>) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            document_url: document_url.into(),
            started_at: Utc::now(),
            events: Vec::new(),
            seq: 0,
        }
    }

    pub fn record(&mut self, kind: EventKind) {
        self.events.push(CycleEvent {
            seq: self.seq,
            ts: Utc::now(),
            kind,
        });
        self.seq += 1;
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Write the timeline to `{data_dir}/harvest-runs/{cycle_id}.json`.
    pub fn persist(&self, data_dir: &Path) -> Result<PathBuf> {
        let dir = data_dir.join("harvest-runs");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(format!("{}.json", self.cycle_id));
        let persisted = PersistedLog {
            cycle_id: self.cycle_id,
            document_url: &self.document_url,
            started_at: self.started_at,
            finished_at: Utc::now(),
            events: &self.events,
        };
        let json = serde_json::to_string_pretty(&persisted).context("Serialize discovery log")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), events = self.events.len(), "Discovery log persisted");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_sequenced_in_order() {
        let mut log = DiscoveryLog::new("https://docs.example.com/document/d/abc/edit");
        log.record(EventKind::StrategyRan {
            strategy: "embedded".to_string(),
            candidates: 2,
        });
        log.record(EventKind::DuplicatesDiscarded { count: 1 });
        assert_eq!(log.event_count(), 2);
        assert_eq!(log.events[0].seq, 0);
        assert_eq!(log.events[1].seq, 1);
    }

    #[test]
    fn events_serialize_with_type_tags() {
        let event = CycleEvent {
            seq: 0,
            ts: Utc::now(),
            kind: EventKind::DispatchIssued {
                url: "https://example.com".to_string(),
                offset_ms: 120,
            },
        };
        let json = serde_json::to_value(&event).expect("serializes");
        assert_eq!(json["type"], "dispatch_issued");
        assert_eq!(json["offset_ms"], 120);
    }
}
