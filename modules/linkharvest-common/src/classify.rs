//! URL classifier — decides whether a candidate string is an actionable link.

/// Transfer and mail schemes that are always actionable.
const RECOGNIZED_SCHEMES: &[&str] = &["http://", "https://", "mailto:"];

/// Classify a candidate string as an actionable link target.
///
/// Total and pure: every input yields a boolean, no side effects. Unschemed
/// strings pass on a permissive host-like heuristic (at least one `.`, no
/// whitespace) because the renderer frequently stores bare hostnames where a
/// full URL belongs.
pub fn classify(candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    if RECOGNIZED_SCHEMES.iter().any(|s| candidate.starts_with(s)) {
        return true;
    }
    candidate.contains('.') && !candidate.chars().any(char::is_whitespace)
}
