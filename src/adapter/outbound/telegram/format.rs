//! MarkdownV2 rendering of the stats report.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::domain::stats::HISTORY_TIME_FORMAT;
use crate::domain::StatsReport;

/// Longest name shown before truncation.
const NAME_WIDTH: usize = 32;

/// Render a report for Telegram `MarkdownV2`.
#[must_use]
pub fn format_report(report: &StatsReport) -> String {
    let now = report.generated_at;
    let mut msg = String::from("📊 *Detection Stats*\n\n");

    if report.is_empty() {
        msg.push_str("Nothing recorded yet\\.\n");
    } else {
        msg.push_str("🏆 *Top Names*\n");
        for (i, (name, count)) in report.top_names.iter().enumerate() {
            let _ = writeln!(
                msg,
                "{}\\. `{}` × {count}",
                i + 1,
                escape_markdown(&truncate(name, NAME_WIDTH))
            );
        }

        if !report.recent.is_empty() {
            msg.push_str("\n🕐 *Latest*\n");
            for entry in &report.recent {
                let when = entry.seen_at.map_or_else(
                    || entry.raw_timestamp.clone(),
                    |at| format_relative(at, now),
                );
                let _ = writeln!(
                    msg,
                    "• `{}` \\({}\\) · {}",
                    escape_markdown(&truncate(&entry.name, NAME_WIDTH)),
                    escape_markdown(&entry.generation),
                    escape_markdown(&when)
                );
            }
        }

        let _ = write!(
            msg,
            "\n📈 Unique: `{}` · Total: `{}` · Tracked jobs: `{}`\n",
            report.unique_names, report.total, report.tracked_jobs
        );
    }

    let _ = write!(
        msg,
        "🔄 Next reset: {}\n_Updated {}_",
        escape_markdown(&format_relative(report.next_reset, now)),
        escape_markdown(&now.format(HISTORY_TIME_FORMAT).to_string())
    );
    msg
}

/// Human-friendly offset of `at` from `now`: `5m ago`, `in 3h`, `just now`.
#[must_use]
pub fn format_relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (at - now).num_seconds();
    if secs.abs() < 5 {
        return "just now".to_string();
    }
    let span = format_span(secs.unsigned_abs());
    if secs > 0 {
        format!("in {span}")
    } else {
        format!("{span} ago")
    }
}

fn format_span(secs: u64) -> String {
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3_599 => format!("{}m", secs / 60),
        3_600..=86_399 => {
            let minutes = (secs % 3_600) / 60;
            if minutes == 0 {
                format!("{}h", secs / 3_600)
            } else {
                format!("{}h {minutes}m", secs / 3_600)
            }
        }
        _ => format!("{}d", secs / 86_400),
    }
}

/// Truncate a string with ellipsis (Unicode-safe).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: [char; 19] = [
        '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.',
        '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
