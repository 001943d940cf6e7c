//! Accessibility-tree scan — links the renderer exposes to assistive tech.
//!
//! Two sources: elements with an explicit `link` role, and elements whose
//! descriptive label embeds a URL (the renderer writes labels like
//! "Link: https://example.com Quarterly report").

use linkharvest_common::LinkCandidate;

use crate::snapshot::DocumentSnapshot;
use crate::strategies::{url_pattern, ExtractionStrategy, LINK_URL_ATTRS};

pub struct AccessibilityTreeScan;

impl ExtractionStrategy for AccessibilityTreeScan {
    fn name(&self) -> &'static str {
        "accessibility"
    }

    fn extract(&self, snapshot: &dyn DocumentSnapshot) -> Vec<LinkCandidate> {
        let re = url_pattern();
        let mut out = Vec::new();
        snapshot.root().walk(&mut |_ancestors, node| {
            if node.role() == Some("link") {
                if let Some(url) = LINK_URL_ATTRS.iter().find_map(|attr| node.attr(attr)) {
                    out.push(LinkCandidate::new(url, node.text_content()));
                }
            }
            if let Some(label) = node.attr("aria-label") {
                if let Some(m) = re.find(label) {
                    let remainder = format!("{}{}", &label[..m.start()], &label[m.end()..]);
                    let text = remainder.split_whitespace().collect::<Vec<_>>().join(" ");
                    out.push(LinkCandidate::new(m.as_str(), text));
                }
            }
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Element, PageSnapshot};
    use crate::testing::DOC_URL;

    #[test]
    fn link_role_yields_url_and_text() {
        let root = Element::new("div").with_child(
            Element::new("span")
                .with_attr("role", "link")
                .with_attr("data-link-url", "https://example.com/r")
                .with_text("Report"),
        );
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        let found = AccessibilityTreeScan.extract(&snap);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "https://example.com/r");
        assert_eq!(found[0].text, "Report");
    }

    #[test]
    fn link_role_without_url_attribute_is_skipped() {
        let root = Element::new("span")
            .with_attr("role", "link")
            .with_text("nothing to open");
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        assert!(AccessibilityTreeScan.extract(&snap).is_empty());
    }

    #[test]
    fn labeled_url_is_extracted_with_remaining_text() {
        let root = Element::new("div")
            .with_attr("aria-label", "Link: https://example.com/q Quarterly report");
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        let found = AccessibilityTreeScan.extract(&snap);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "https://example.com/q");
        assert_eq!(found[0].text, "Link: Quarterly report");
    }

    #[test]
    fn url_only_label_falls_back_to_url_text() {
        let root = Element::new("div").with_attr("aria-label", "https://example.com/only");
        let snap = PageSnapshot::new(DOC_URL).with_root(root);
        let found = AccessibilityTreeScan.extract(&snap);
        assert_eq!(found[0].text, "https://example.com/only");
    }
}
