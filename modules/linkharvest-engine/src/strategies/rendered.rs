//! Rendered-structure scan — link-styled runs in the element tree.
//!
//! The renderer separates visual link styling from link data: the run that
//! looks like a link rarely carries the URL itself. This strategy finds
//! elements with link-indicating signals (the host's link foreground color,
//! an underline decoration, an explicit link role) and walks ancestors
//! upward for the URL-bearing attribute.

use linkharvest_common::LinkCandidate;
use tracing::debug;

use crate::snapshot::{DocumentSnapshot, Element};
use crate::strategies::{ExtractionStrategy, LINK_URL_ATTRS};

pub struct RenderedStructureScan {
    link_color: String,
}

impl RenderedStructureScan {
    pub fn new(link_color: impl Into<String>) -> Self {
        Self {
            link_color: link_color.into(),
        }
    }

    fn is_link_styled(&self, element: &Element) -> bool {
        element
            .style
            .color
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(&self.link_color))
            || element.style.underline
            || element.role() == Some("link")
    }
}

impl ExtractionStrategy for RenderedStructureScan {
    fn name(&self) -> &'static str {
        "rendered"
    }

    fn extract(&self, snapshot: &dyn DocumentSnapshot) -> Vec<LinkCandidate> {
        let mut out = Vec::new();
        snapshot.root().walk(&mut |ancestors, node| {
            if !self.is_link_styled(node) {
                return;
            }
            let Some(url) = carried_url(node, ancestors) else {
                debug!(tag = node.tag.as_str(), "Link-styled run without a URL-bearing ancestor");
                return;
            };
            out.push(LinkCandidate::new(url, node.text_content()));
        });
        out
    }
}

/// The URL for a styled run: on the run itself, or on the nearest ancestor,
/// innermost first.
fn carried_url(node: &Element, ancestors: &[&Element]) -> Option<String> {
    std::iter::once(node)
        .chain(ancestors.iter().rev().copied())
        .find_map(|el| {
            LINK_URL_ATTRS
                .iter()
                .find_map(|attr| el.attr(attr))
                .map(str::to_string)
        })
}
