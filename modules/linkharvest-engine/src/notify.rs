//! User-facing notices and prompts, behind a trait so the workflow can be
//! exercised against scripted answers.

use std::io::{self, BufRead, Write};

/// Everything the engine says to, or asks of, the user.
pub trait UserNotifier: Send + Sync {
    /// One-way notice ("no links found", the dispatch summary).
    fn notice(&self, message: &str);

    /// Yes/no confirmation (bulk-open threshold, fallback-service offer).
    fn confirm(&self, message: &str) -> bool;

    /// Free-form prompt (fallback endpoint). `None` when the user declines.
    fn prompt(&self, message: &str) -> Option<String>;
}

/// Console-backed notifier used by the CLI.
pub struct ConsoleNotifier;

impl UserNotifier for ConsoleNotifier {
    fn notice(&self, message: &str) {
        println!("{message}");
    }

    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn prompt(&self, message: &str) -> Option<String> {
        print!("{message}: ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return None;
        }
        let answer = line.trim();
        if answer.is_empty() {
            None
        } else {
            Some(answer.to_string())
        }
    }
}
