//! Aggregator — fixed-priority strategy execution, merge, dedup, fallback.

use std::collections::HashSet;

use linkharvest_common::{canonical_document_url, EngineConfig, LinkCandidate};
use tracing::{info, warn};

use crate::fallback::RemoteFallback;
use crate::run_log::{DiscoveryLog, EventKind};
use crate::snapshot::DocumentSnapshot;
use crate::strategies::{
    AccessibilityTreeScan, EmbeddedDataScan, ExtractionStrategy, RenderedStructureScan,
    VisibleAnchorScan,
};

pub struct Harvester {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    fallback: RemoteFallback,
}

impl Harvester {
    /// Build the standard strategy chain. Order is fallback priority:
    /// embedded data first, visible anchors last.
    pub fn new(config: &EngineConfig, fallback: RemoteFallback) -> Self {
        Self {
            strategies: vec![
                Box::new(EmbeddedDataScan::new(config.embedded_depth_limit)),
                Box::new(RenderedStructureScan::new(config.link_color.clone())),
                Box::new(AccessibilityTreeScan),
                Box::new(VisibleAnchorScan::new(config.content_markers.clone())),
            ],
            fallback,
        }
    }

    /// Run one discovery pass: every strategy in priority order, results
    /// merged and deduplicated on the exact `(url, text)` pair, first
    /// occurrence kept. Offers the remote fallback when the deduplicated
    /// set is empty. Never fails: strategy faults are contained at the
    /// strategy boundary and a fallback fault only logs.
    pub async fn discover(
        &self,
        snapshot: &dyn DocumentSnapshot,
        log: &mut DiscoveryLog,
    ) -> Vec<LinkCandidate> {
        let mut merged = Vec::new();
        for strategy in &self.strategies {
            let found = strategy.extract(snapshot);
            info!(strategy = strategy.name(), count = found.len(), "Strategy complete");
            log.record(EventKind::StrategyRan {
                strategy: strategy.name().to_string(),
                candidates: found.len() as u32,
            });
            merged.extend(found);
        }

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut candidates = Vec::new();
        let mut discarded: u32 = 0;
        for candidate in merged {
            if seen.insert((candidate.url.clone(), candidate.text.clone())) {
                candidates.push(candidate);
            } else {
                discarded += 1;
            }
        }
        if discarded > 0 {
            info!(discarded, "Dropped repeat finds across strategies");
            log.record(EventKind::DuplicatesDiscarded { count: discarded });
        }

        if candidates.is_empty() {
            let canonical = canonical_document_url(snapshot.url());
            match self.fallback.offer(&canonical).await {
                Ok(accepted) => log.record(EventKind::FallbackOffered { accepted }),
                Err(error) => warn!(error = %error, "Remote fallback failed"),
            }
        }

        info!(count = candidates.len(), "Discovery complete");
        candidates
    }
}
