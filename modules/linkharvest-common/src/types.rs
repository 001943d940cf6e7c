use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::classify;

/// Maximum label length when falling back to the URL as display text.
const LABEL_MAX_CHARS: usize = 50;

/// A single unverified hyperlink found in a document snapshot.
///
/// Immutable once constructed. `is_valid` is computed exactly once from the
/// raw URL and never recomputed; the label fallback is applied at
/// construction so `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    /// Best-effort human-readable label. Never empty.
    pub text: String,
    /// The raw, untrusted string a strategy found. Not normalized.
    pub url: String,
    /// Classifier verdict at creation time.
    pub is_valid: bool,
}

impl LinkCandidate {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        let url = url.into();
        let text = text.into();
        let text = if text.trim().is_empty() {
            fallback_label(&url)
        } else {
            text
        };
        let is_valid = classify(&url);
        Self { text, url, is_valid }
    }

    /// Composite identity used for deduplication: the exact, untrimmed
    /// url/text pair. Candidates differing only in case or trailing slash
    /// are distinct on purpose.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.url, &self.text)
    }
}

fn fallback_label(url: &str) -> String {
    if url.chars().count() > LABEL_MAX_CHARS {
        let truncated: String = url.chars().take(LABEL_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        url.to_string()
    }
}

/// Strip query and fragment from a live editor URL. The remainder is the
/// canonical document URL handed to the fallback service.
pub fn canonical_document_url(live_url: &str) -> String {
    let no_query = live_url.split('?').next().unwrap_or(live_url);
    let no_fragment = no_query.split('#').next().unwrap_or(no_query);
    no_fragment.to_string()
}

/// Extract the document id from an editor URL (`.../document/d/{id}`).
/// Returns `None` when the URL is not a document page.
pub fn document_id(url: &str) -> Option<String> {
    let re = Regex::new(r"/document/d/([A-Za-z0-9_-]+)").expect("valid regex");
    re.captures(url).map(|c| c[1].to_string())
}
