//! Human-readable output for expressions and inventory reports.
//!
//! Colors:
//! - Expired: red
//! - Ready / still valid: green
//! - Unreadable expiry: yellow
//! - Manual statuses: default

use chemshelf_core::{
    format_timestamp, is_expired_at, truncate_str, Clock, InventoryStats, ParsedDate,
    RecordStatus, Status,
};
use chrono::Local;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Longest name shown in the inventory table.
const MAX_NAME_CHARS: usize = 32;

/// How one expiry expression reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionReport {
    pub input: String,
    pub parsed: Option<ParsedDate>,
    pub expired: bool,
}

impl ExpressionReport {
    pub fn evaluate(input: &str, clock: &dyn Clock) -> Self {
        let parsed = chemshelf_core::parse_flexible_date(input);
        let expired = parsed.is_some_and(|p| is_expired_at(&p, clock.now()));
        Self {
            input: input.to_string(),
            parsed,
            expired,
        }
    }

    /// Multi-line text block for this expression.
    pub fn render(&self) -> String {
        let reads_as = match &self.parsed {
            Some(parsed) => format!("{} ({})", parsed, parsed.granularity),
            None => "no date".dimmed().to_string(),
        };
        let verdict = match (&self.parsed, self.expired) {
            (None, _) => "unreadable, never expired".yellow(),
            (Some(_), true) => "expired".red().bold(),
            (Some(_), false) => "valid".green(),
        };

        format!(
            "{} {}\n  {:<10} {}\n  {:<10} {}\n",
            "▶".blue().bold(),
            self.input.bold(),
            "Reads as",
            reads_as,
            "Status",
            verdict
        )
    }
}

/// Inventory report document for `--json`.
#[derive(Debug, Serialize)]
pub struct InventoryReport<'a> {
    pub records: &'a [RecordStatus],
    pub stats: InventoryStats,
}

fn colorize_status(status: &Status, text: &str) -> ColoredString {
    match status {
        Status::Expired => text.red().bold(),
        Status::Ready => text.green(),
        _ => text.normal(),
    }
}

/// Pad to a display width, counting wide and zero-width characters properly.
fn pad(text: &str, width: usize) -> String {
    let shown = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(shown)))
}

/// Render records as an aligned table.
pub fn render_table(rows: &[RecordStatus]) -> String {
    const HEADERS: [&str; 6] = ["ID", "Name", "Expiry", "Reads as", "Updated", "Status"];

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            let reads_as = row
                .parsed_expiry
                .map(|p| p.date().format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let status = if row.is_auto_expired() {
                format!("{} ({}) *", row.status, row.status.label_th())
            } else {
                format!("{} ({})", row.status, row.status.label_th())
            };
            [
                row.id.clone(),
                truncate_str(&row.name, MAX_NAME_CHARS),
                if row.expiry.trim().is_empty() {
                    "-".to_string()
                } else {
                    row.expiry.clone()
                },
                reads_as,
                format_timestamp(row.last_updated, &Local),
                status,
            ]
        })
        .collect();

    let mut widths = HEADERS.map(UnicodeWidthStr::width);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let mut output = String::new();
    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w))
        .collect();
    output.push_str(header.join("  ").trim_end());
    output.push('\n');

    for (row, status) in cells.iter().zip(rows) {
        let last = row.len() - 1;
        let mut line: Vec<String> = row[..last]
            .iter()
            .zip(widths)
            .map(|(cell, w)| pad(cell, w))
            .collect();
        line.push(colorize_status(&status.status, &row[last]).to_string());
        output.push_str(&line.join("  "));
        output.push('\n');
    }

    output
}

/// One value per line, or `(none)`.
pub fn render_values(values: &[&str]) -> String {
    if values.is_empty() {
        return format!("{}\n", "(none)".dimmed());
    }
    values.iter().map(|v| format!("{}\n", v)).collect()
}

/// One-line dashboard summary.
pub fn render_stats(stats: &InventoryStats) -> String {
    format!(
        "Total {}  ·  Ready {}  ·  Expired {}  ·  Dispose {}  ·  Flammable {}",
        stats.total,
        stats.ready.to_string().green(),
        stats.expired.to_string().red().bold(),
        stats.dispose,
        stats.flammable
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemshelf_core::{FixedClock, Inventory};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn clock() -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
    }

    #[test]
    fn test_expression_report() {
        let report = ExpressionReport::evaluate("06/2024", &clock());
        assert!(report.expired);
        assert_eq!(report.parsed.unwrap().month(), 6);

        let report = ExpressionReport::evaluate("ask lab", &clock());
        assert!(!report.expired);
        assert!(report.parsed.is_none());
    }

    #[test]
    fn test_expression_render() {
        colored::control::set_override(false);
        let rendered = ExpressionReport::evaluate("พ.ค.-26", &clock()).render();
        assert_eq!(
            rendered,
            "▶ พ.ค.-26\n  Reads as   31/05/2026 23:59:59 (month)\n  Status     valid\n"
        );
    }

    #[test]
    fn test_pad_uses_display_width() {
        // Thai vowel marks take no columns
        assert_eq!(UnicodeWidthStr::width(pad("มี.ค.", 6).as_str()), 6);
        assert_eq!(pad("abc", 2), "abc");
    }

    #[test]
    fn test_render_table() {
        colored::control::set_override(false);
        let inventory = Inventory::from_json(
            r#"[
                { "id": "C-1", "name": "Acetone", "expiry": "06/2024", "status": "Ready" },
                { "id": "C-2", "name": "Ether", "expiry": "", "status": "Dispose" }
            ]"#,
        )
        .unwrap();
        let table = render_table(&inventory.evaluate(&clock()));
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID   Name     Expiry   Reads as    Updated  Status"));
        assert!(lines[1].contains("2024-06-30"));
        assert!(lines[1].ends_with("Expired (หมดอายุ) *"));
        assert!(lines[2].ends_with("Dispose (ส่งกำจัด)"));
    }

    #[test]
    fn test_render_table_last_updated() {
        colored::control::set_override(false);
        let inventory = Inventory::from_json(
            r#"[
                { "id": "C-1", "expiry": "2030", "lastUpdated": 1718454600000 },
                { "id": "C-2", "expiry": "2030" }
            ]"#,
        )
        .unwrap();
        let table = render_table(&inventory.evaluate(&clock()));
        let lines: Vec<&str> = table.lines().collect();

        let shown = format_timestamp(Some(1718454600000), &Local);
        assert!(shown.contains("/06/2024 at "));
        assert!(lines[1].contains(&shown));
        assert!(lines[2].contains("  -  "));
    }

    #[test]
    fn test_render_values() {
        colored::control::set_override(false);
        assert_eq!(render_values(&["Cabinet A", "Fridge"]), "Cabinet A\nFridge\n");
        assert_eq!(render_values(&[]), "(none)\n");
    }

    #[test]
    fn test_render_stats() {
        colored::control::set_override(false);
        let stats = InventoryStats {
            total: 3,
            ready: 1,
            expired: 1,
            dispose: 1,
            flammable: 0,
        };
        assert_eq!(
            render_stats(&stats),
            "Total 3  ·  Ready 1  ·  Expired 1  ·  Dispose 1  ·  Flammable 0"
        );
    }
}
