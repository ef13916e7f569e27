//! `mark-read` command output.

use super::{OutputFormat, to_json};
use crate::Result;
use crate::services::{MarkReadOutcome, MarkReadScope};
use std::fmt::Write;

/// Renders the outcome of a bucket mark-as-read.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_mark_read(outcome: &MarkReadOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(outcome),
        OutputFormat::Table => {
            let target = match outcome.scope {
                MarkReadScope::Range { bucket, range } => format!("{} {range}", bucket.label()),
                MarkReadScope::AllGloballyVisible => "all globally visible feeds".to_string(),
            };
            let mut line = format!(
                "Marked {} entries as read ({target})",
                outcome.entries_marked
            );
            if outcome.fallback {
                let _ = write!(line, "; selector '{}' was not recognized", outcome.selector);
            }
            line.push('\n');
            Ok(line)
        },
    }
}
