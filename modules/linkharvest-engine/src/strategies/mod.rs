//! Extraction strategies — independent producers of raw link candidates.
//!
//! Strategies run in a fixed priority order decided by the aggregator, but
//! never depend on each other; repeat-finds across strategies are expected
//! and resolved by the aggregator's dedup pass. A strategy contains its own
//! failures: internal faults are logged and absorbed, yielding whatever
//! partial results were gathered.

pub mod accessibility;
pub mod anchors;
pub mod embedded;
pub mod rendered;

pub use accessibility::AccessibilityTreeScan;
pub use anchors::VisibleAnchorScan;
pub use embedded::EmbeddedDataScan;
pub use rendered::RenderedStructureScan;

use linkharvest_common::LinkCandidate;
use regex::Regex;

use crate::snapshot::DocumentSnapshot;

/// One independent method of locating candidates within a document snapshot.
pub trait ExtractionStrategy: Send + Sync {
    /// Stable name used in logs and the discovery timeline.
    fn name(&self) -> &'static str;

    /// Extract candidates. Must never panic past this boundary; total
    /// failure yields an empty sequence.
    fn extract(&self, snapshot: &dyn DocumentSnapshot) -> Vec<LinkCandidate>;
}

/// Pattern for URLs embedded in free text (script payloads, labels).
pub(crate) fn url_pattern() -> Regex {
    Regex::new(r#"https?://[^\s"'<>)]+"#).expect("valid regex")
}

/// Attributes that may carry the actual URL for a visually-styled link run.
/// The renderer keeps link data apart from link styling, so strategies check
/// the dedicated attribute before the native one.
pub(crate) const LINK_URL_ATTRS: &[&str] = &["data-link-url", "href"];
