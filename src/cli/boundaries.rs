//! `boundaries` command output.

use super::{OutputFormat, to_json};
use crate::Result;
use crate::buckets::{Bucket, BucketSet, PartitionScheme};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt::Write;

#[derive(Serialize)]
struct BoundariesReport {
    scheme: PartitionScheme,
    timezone: &'static str,
    reference: String,
    buckets: Vec<BoundaryRow>,
}

#[derive(Serialize)]
struct BoundaryRow {
    bucket: Bucket,
    label: &'static str,
    after: Option<String>,
    before: Option<String>,
    empty: bool,
}

/// Renders a bucket set with boundaries shown in `tz`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_boundaries(set: &BucketSet, tz: Tz, format: OutputFormat) -> Result<String> {
    let local = |ts: DateTime<Utc>| ts.with_timezone(&tz).to_rfc3339();
    let report = BoundariesReport {
        scheme: set.scheme(),
        timezone: tz.name(),
        reference: local(set.reference()),
        buckets: set
            .iter()
            .map(|b| BoundaryRow {
                bucket: b.bucket,
                label: b.bucket.label(),
                after: b.range.after.map(local),
                before: b.range.before.map(local),
                empty: b.range.is_empty(),
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Table => Ok(render_table(&report)),
    }
}

fn render_table(report: &BoundariesReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Scheme: {}  Timezone: {}  Reference: {}",
        report.scheme, report.timezone, report.reference
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<10} {:<27} {:<27}", "BUCKET", "FROM (inclusive)", "UNTIL (exclusive)");
    for row in &report.buckets {
        let _ = write!(
            out,
            "{:<10} {:<27} {:<27}",
            row.bucket.as_str(),
            row.after.as_deref().unwrap_or("-"),
            row.before.as_deref().unwrap_or("-"),
        );
        if row.empty {
            out.push_str(" (empty)");
        }
        out.push('\n');
    }
    out
}
