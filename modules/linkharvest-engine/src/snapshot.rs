//! Document snapshot — the injected, read-only view of the rendered page.
//!
//! The engine never touches a live page. Everything a strategy can observe
//! (element tree, computed style signals, embedded state payloads, inline
//! scripts, the live URL) is captured behind `DocumentSnapshot`, so the core
//! runs identically against a host adapter or a synthetic fixture.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Computed style signals the renderer exposes per element. Only the signals
/// the strategies read are modeled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    /// Foreground color as the renderer reports it, e.g. `#1155cc`.
    #[serde(default)]
    pub color: Option<String>,
    /// Whether the element carries an underline decoration.
    #[serde(default)]
    pub underline: bool,
}

/// One element in the rendered tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// The element's own text, exclusive of children.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Accessibility role, when the renderer exposes one.
    pub fn role(&self) -> Option<&str> {
        self.attr("role")
    }

    /// Concatenated text of this element and its descendants, in document
    /// order, whitespace-joined.
    pub fn text_content(&self) -> String {
        let mut pieces = Vec::new();
        self.collect_text(&mut pieces);
        pieces.join(" ")
    }

    fn collect_text<'a>(&'a self, pieces: &mut Vec<&'a str>) {
        let own = self.text.trim();
        if !own.is_empty() {
            pieces.push(own);
        }
        for child in &self.children {
            child.collect_text(pieces);
        }
    }

    /// Depth-first walk over this element and every descendant. The callback
    /// receives the ancestor chain (outermost first) and the node itself, so
    /// strategies can look upward without parent pointers.
    pub fn walk<'a>(&'a self, f: &mut dyn FnMut(&[&'a Element], &'a Element)) {
        fn go<'a>(
            node: &'a Element,
            ancestors: &mut Vec<&'a Element>,
            f: &mut dyn FnMut(&[&'a Element], &'a Element),
        ) {
            f(ancestors, node);
            ancestors.push(node);
            for child in &node.children {
                go(child, ancestors, f);
            }
            ancestors.pop();
        }
        go(self, &mut Vec::new(), f);
    }
}

/// Read-only view of the rendered document, injected into the engine.
pub trait DocumentSnapshot: Send + Sync {
    /// Root of the rendered element tree.
    fn root(&self) -> &Element;

    /// Parsed global-state containers the host page exposes.
    fn embedded_payloads(&self) -> &[Value];

    /// Raw inline script text, scanned for URL patterns.
    fn inline_scripts(&self) -> &[String];

    /// The live URL as the host reports it (query and fragment included).
    fn url(&self) -> &str;
}

/// Concrete snapshot, deserializable from a JSON fixture. The CLI and the
/// test suite both load these; a host adapter would build one from the live
/// page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default)]
    pub root: Element,
    #[serde(default)]
    pub embedded_payloads: Vec<Value>,
    #[serde(default)]
    pub inline_scripts: Vec<String>,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_root(mut self, root: Element) -> Self {
        self.root = root;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.embedded_payloads.push(payload);
        self
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.inline_scripts.push(script.into());
        self
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot fixture {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed snapshot fixture {}", path.display()))
    }
}

impl DocumentSnapshot for PageSnapshot {
    fn root(&self) -> &Element {
        &self.root
    }

    fn embedded_payloads(&self) -> &[Value] {
        &self.embedded_payloads
    }

    fn inline_scripts(&self) -> &[String] {
        &self.inline_scripts
    }

    fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_joins_descendants_in_order() {
        let el = Element::new("p")
            .with_text("Read")
            .with_child(Element::new("span").with_text("the"))
            .with_child(Element::new("span").with_text("docs"));
        assert_eq!(el.text_content(), "Read the docs");
    }

    #[test]
    fn walk_reports_ancestor_chains() {
        let tree = Element::new("root")
            .with_child(Element::new("section").with_child(Element::new("a")));
        let mut chains = Vec::new();
        tree.walk(&mut |ancestors, node| {
            let chain: Vec<&str> = ancestors.iter().map(|a| a.tag.as_str()).collect();
            chains.push((chain, node.tag.clone()));
        });
        assert_eq!(chains.len(), 3);
        assert_eq!(chains[2].0, vec!["root", "section"]);
        assert_eq!(chains[2].1, "a");
    }

    #[test]
    fn snapshot_fixture_roundtrip() {
        let raw = r#"{
            "url": "https://docs.example.com/document/d/abc/edit",
            "root": {"tag": "body", "children": [{"tag": "a", "attrs": {"href": "https://example.com"}, "text": "x"}]},
            "inline_scripts": ["var u = 'https://inline.example.com';"]
        }"#;
        let snap: PageSnapshot = serde_json::from_str(raw).expect("fixture parses");
        assert_eq!(snap.root().children.len(), 1);
        assert_eq!(snap.inline_scripts().len(), 1);
        assert!(snap.embedded_payloads().is_empty());
    }
}
