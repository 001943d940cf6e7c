//! Visible-anchor scan — native anchors, minus host chrome.
//!
//! Editor pages are full of anchors that have nothing to do with the
//! document: account menus, help links, policy footers. Three filters keep
//! only document content: a host-UI domain denylist, a UI-phrase denylist on
//! the label, and a requirement that the anchor sits inside a document
//! content container.

use linkharvest_common::LinkCandidate;
use tracing::debug;

use crate::snapshot::{DocumentSnapshot, Element};
use crate::strategies::ExtractionStrategy;

/// Host-UI destinations that are chrome, not document content.
const NOISE_DOMAINS: &[&str] = &[
    "accounts.google.com",
    "myaccount.google.com",
    "support.google.com",
    "policies.google.com",
    "workspace.google.com",
    "about.google",
];

/// Anchor labels that belong to host UI, not document links. Compared
/// against the whole label, trimmed and lowercased.
const NOISE_PHRASES: &[&str] = &[
    "help",
    "sign in",
    "sign out",
    "settings",
    "privacy",
    "terms",
    "feedback",
    "report abuse",
    "learn more",
];

pub struct VisibleAnchorScan {
    content_markers: Vec<String>,
}

impl VisibleAnchorScan {
    pub fn new(content_markers: Vec<String>) -> Self {
        Self { content_markers }
    }

    /// True when the element is one of the structural markers that delimit
    /// in-document material (matched against class tokens and the id).
    fn is_content_container(&self, element: &Element) -> bool {
        let class_hit = element.attr("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|token| self.content_markers.iter().any(|m| m == token))
        });
        let id_hit = element
            .attr("id")
            .is_some_and(|id| self.content_markers.iter().any(|m| m == id));
        class_hit || id_hit
    }
}

impl ExtractionStrategy for VisibleAnchorScan {
    fn name(&self) -> &'static str {
        "anchors"
    }

    fn extract(&self, snapshot: &dyn DocumentSnapshot) -> Vec<LinkCandidate> {
        let mut out = Vec::new();
        snapshot.root().walk(&mut |ancestors, node| {
            if node.tag != "a" {
                return;
            }
            let Some(href) = node.attr("href") else {
                return;
            };
            if !ancestors.iter().any(|el| self.is_content_container(el)) {
                debug!(href, "Anchor outside document content, treated as chrome");
                return;
            }
            if is_noise_target(href) {
                debug!(href, "Anchor target on host-UI denylist");
                return;
            }
            let text = node.text_content();
            if is_noise_label(&text) {
                debug!(href, label = text.as_str(), "Anchor label is host UI");
                return;
            }
            out.push(LinkCandidate::new(href, text));
        });
        out
    }
}

fn is_noise_target(href: &str) -> bool {
    let domain = extract_domain(href);
    NOISE_DOMAINS.iter().any(|noise| domain.contains(noise))
}

fn is_noise_label(label: &str) -> bool {
    let normalized = label.trim().to_lowercase();
    NOISE_PHRASES.iter().any(|phrase| normalized == *phrase)
}

fn extract_domain(url: &str) -> String {
    url.split("://")
        .nth(1)
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::PageSnapshot;
    use crate::testing::{anchor, content_page, DOC_URL};

    fn scan() -> VisibleAnchorScan {
        VisibleAnchorScan::new(vec!["kix-page".to_string()])
    }

    #[test]
    fn content_anchor_is_kept() {
        let root = content_page(vec![anchor("https://example.com/a", "Example")]);
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        let found = scan().extract(&snap);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "https://example.com/a");
    }

    #[test]
    fn host_ui_domain_is_excluded_even_when_valid() {
        let root = content_page(vec![anchor(
            "https://accounts.google.com/signin",
            "My account",
        )]);
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        assert!(scan().extract(&snap).is_empty());
    }

    #[test]
    fn ui_phrase_label_is_excluded() {
        let root = content_page(vec![
            anchor("https://example.com/x", "Sign in"),
            anchor("https://example.com/y", "  HELP  "),
        ]);
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        assert!(scan().extract(&snap).is_empty());
    }

    #[test]
    fn phrase_inside_longer_label_is_not_noise() {
        let root = content_page(vec![anchor(
            "https://example.com/guide",
            "Help center migration guide",
        )]);
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        assert_eq!(scan().extract(&snap).len(), 1);
    }

    #[test]
    fn anchor_outside_content_container_is_chrome() {
        let root = Element::new("body")
            .with_child(anchor("https://example.com/toolbar", "Toolbar link"))
            .with_child(content_page(vec![anchor(
                "https://example.com/doc",
                "Doc link",
            )]));
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        let found = scan().extract(&snap);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "https://example.com/doc");
    }

    #[test]
    fn id_marker_also_counts_as_container() {
        let root = Element::new("div")
            .with_attr("id", "kix-page")
            .with_child(anchor("https://example.com/z", "By id"));
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        assert_eq!(scan().extract(&snap).len(), 1);
    }
}
