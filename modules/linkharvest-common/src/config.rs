use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Stagger band that keeps batch opens below popup-blocker burst heuristics.
const STAGGER_MIN_MS: u64 = 100;
const STAGGER_MAX_MS: u64 = 150;

/// Engine configuration. Every knob has a default; `from_env` applies
/// `LINKHARVEST_*` overrides on top.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Recursion bound for the embedded-data scan.
    pub embedded_depth_limit: usize,
    /// Delay between successive context-open issues during dispatch.
    pub stagger: Duration,
    /// Chosen sets larger than this require explicit confirmation.
    pub bulk_open_threshold: usize,
    /// Delay between the final open issue and the summary notice.
    pub summary_delay: Duration,
    /// Foreground color the host's renderer applies to link runs.
    pub link_color: String,
    /// Class/id markers that distinguish document content from host chrome.
    pub content_markers: Vec<String>,
    /// Root directory for persisted artifacts (discovery logs, fallback
    /// endpoint). Honors `DATA_DIR`.
    pub data_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            embedded_depth_limit: 5,
            stagger: Duration::from_millis(120),
            bulk_open_threshold: 10,
            summary_delay: Duration::from_millis(500),
            link_color: "#1155cc".to_string(),
            content_markers: vec![
                "kix-page".to_string(),
                "kix-appview-editor".to_string(),
                "docs-editor".to_string(),
            ],
            data_dir: PathBuf::from("data"),
        }
    }
}

impl EngineConfig {
    /// Load configuration, overriding defaults from environment variables.
    /// Panics with a clear message if a numeric override is malformed.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            embedded_depth_limit: numeric_env("LINKHARVEST_DEPTH_LIMIT", defaults.embedded_depth_limit),
            stagger: Duration::from_millis(
                numeric_env("LINKHARVEST_STAGGER_MS", defaults.stagger.as_millis() as u64)
                    .clamp(STAGGER_MIN_MS, STAGGER_MAX_MS),
            ),
            bulk_open_threshold: numeric_env(
                "LINKHARVEST_BULK_THRESHOLD",
                defaults.bulk_open_threshold,
            ),
            summary_delay: Duration::from_millis(numeric_env(
                "LINKHARVEST_SUMMARY_DELAY_MS",
                defaults.summary_delay.as_millis() as u64,
            )),
            link_color: env::var("LINKHARVEST_LINK_COLOR").unwrap_or(defaults.link_color),
            content_markers: defaults.content_markers,
            data_dir: PathBuf::from(
                env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            ),
        }
    }
}

fn numeric_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}
