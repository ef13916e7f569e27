//! `view` command output.

use super::{OutputFormat, to_json};
use crate::Result;
use crate::services::BucketedView;
use std::fmt::Write;

/// Renders a bucketed view.
///
/// The table lists every bucket's unread count, then the entries of the
/// displayed buckets with times in the user's timezone.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_view(view: &BucketedView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(view),
        OutputFormat::Table => Ok(render_table(view)),
    }
}

fn render_table(view: &BucketedView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "User {}  Scheme: {}  Timezone: {}  Reference: {}",
        view.user_id,
        view.scheme,
        view.timezone,
        view.reference.to_rfc3339()
    );
    let _ = write!(out, "Selection: {}", view.selection);
    if view.fallback {
        let _ = write!(out, " (unrecognized selector '{}')", view.selector);
    }
    out.push_str("\n\n");

    let _ = writeln!(out, "{:<10} {:<14} {:>7}", "BUCKET", "LABEL", "UNREAD");
    for bucket in &view.buckets {
        let _ = writeln!(
            out,
            "{:<10} {:<14} {:>7}",
            bucket.bucket.as_str(),
            bucket.label,
            bucket.unread_count
        );
    }
    let _ = writeln!(out, "{:<25} {:>7}", "Total unread", view.total_unread);

    let offset = view.reference.timezone();
    for bucket in &view.buckets {
        let Some(entries) = &bucket.entries else {
            continue;
        };
        let _ = writeln!(out, "\n{} ({})", bucket.label, entries.len());
        if entries.is_empty() {
            out.push_str("  (no unread entries)\n");
        }
        for entry in entries {
            let _ = write!(
                out,
                "  #{:<6} {}  {}",
                entry.id.get(),
                entry.published_at.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
                entry.title
            );
            if !entry.url.is_empty() {
                let _ = write!(out, "  <{}>", entry.url);
            }
            out.push('\n');
        }
    }
    out
}
