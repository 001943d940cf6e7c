//! Embedded-data scan — URLs hiding in the host page's state payloads.
//!
//! Canvas renderers keep the document model in global state containers and
//! inline script payloads rather than in the visible tree. This strategy
//! walks those structures for URL-shaped strings, with an explicit depth
//! counter so cyclic or very deep payloads cannot run away.

use linkharvest_common::LinkCandidate;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::snapshot::DocumentSnapshot;
use crate::strategies::{url_pattern, ExtractionStrategy};

/// Context window taken either side of a URL match when deriving a label.
const CONTEXT_WINDOW_CHARS: usize = 30;
/// Words kept from each side of the window.
const CONTEXT_WORDS: usize = 3;

pub struct EmbeddedDataScan {
    depth_limit: usize,
}

impl EmbeddedDataScan {
    pub fn new(depth_limit: usize) -> Self {
        Self { depth_limit }
    }
}

impl ExtractionStrategy for EmbeddedDataScan {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn extract(&self, snapshot: &dyn DocumentSnapshot) -> Vec<LinkCandidate> {
        let re = url_pattern();
        let mut out = Vec::new();
        for payload in snapshot.embedded_payloads() {
            walk_value(payload, 0, self.depth_limit, &re, &mut out);
        }
        for script in snapshot.inline_scripts() {
            scan_text(script, &re, &mut out);
        }
        out
    }
}

/// Bounded recursive walk. Values nested deeper than `limit` container
/// levels are skipped, never visited.
fn walk_value(value: &Value, depth: usize, limit: usize, re: &Regex, out: &mut Vec<LinkCandidate>) {
    if depth > limit {
        debug!(depth, limit, "Embedded payload exceeds depth bound, pruning");
        return;
    }
    match value {
        Value::String(s) => scan_text(s, re, out),
        Value::Array(items) => {
            for item in items {
                walk_value(item, depth + 1, limit, re, out);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                walk_value(item, depth + 1, limit, re, out);
            }
        }
        _ => {}
    }
}

fn scan_text(text: &str, re: &Regex, out: &mut Vec<LinkCandidate>) {
    for m in re.find_iter(text) {
        let label = context_label(text, m.start(), m.end()).unwrap_or_default();
        out.push(LinkCandidate::new(m.as_str(), label));
    }
}

/// Label heuristic: a 30-character window either side of the match, split
/// into words, keeping the last 3 before and first 3 after. `None` when the
/// match has no surrounding context (the candidate then labels itself with
/// its URL).
fn context_label(text: &str, start: usize, end: usize) -> Option<String> {
    let before: String = text[..start]
        .chars()
        .rev()
        .take(CONTEXT_WINDOW_CHARS)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let after: String = text[end..].chars().take(CONTEXT_WINDOW_CHARS).collect();

    let before_words: Vec<&str> = before.split_whitespace().collect();
    let keep_from = before_words.len().saturating_sub(CONTEXT_WORDS);

    let mut words: Vec<&str> = before_words[keep_from..].to_vec();
    words.extend(after.split_whitespace().take(CONTEXT_WORDS));

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}
