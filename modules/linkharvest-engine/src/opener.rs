//! Browsing-context creation, behind a trait so dispatch is testable and
//! the CLI can run dry.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Opens a URL in a new browsing context. One call per opened link.
#[async_trait]
pub trait ContextOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs through the platform's URL-opener command.
pub struct CommandOpener {
    command: String,
}

impl CommandOpener {
    pub fn new() -> Self {
        let command = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        Self {
            command: command.to_string(),
        }
    }

    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for CommandOpener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextOpener for CommandOpener {
    async fn open(&self, url: &str) -> Result<()> {
        // Only hand well-formed web/mail URLs to the shell command.
        let parsed = url::Url::parse(url).context("Invalid URL")?;
        if !matches!(parsed.scheme(), "http" | "https" | "mailto") {
            bail!("Only http/https/mailto URLs are allowed, got: {}", parsed.scheme());
        }

        let status = tokio::process::Command::new(&self.command)
            .arg(url)
            .status()
            .await
            .with_context(|| format!("Failed to launch {} for {url}", self.command))?;

        if !status.success() {
            bail!("{} exited with {status} for {url}", self.command);
        }
        Ok(())
    }
}

/// Logs what would be opened. Used by the CLI's `--dry-run` mode.
pub struct DryRunOpener;

#[async_trait]
impl ContextOpener for DryRunOpener {
    async fn open(&self, url: &str) -> Result<()> {
        info!(url, "Dry run: would open in a new browsing context");
        Ok(())
    }
}
