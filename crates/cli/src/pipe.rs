//! Pipe mode for processing stdin line by line.
//!
//! Each non-empty line is one expiry expression, so a spreadsheet column
//! can be checked with `cut -d, -f8 inventory.csv | chemshelf`.

use std::io::{self, BufRead, Write};

use chemshelf_core::Clock;

use crate::report::ExpressionReport;

/// Configuration for pipe mode.
pub struct PipeModeConfig {
    /// Output one JSON object per line instead of text blocks
    pub json: bool,
    /// Only print expressions that read as expired
    pub expired_only: bool,
}

/// Run pipe mode, processing stdin line by line.
pub fn run_pipe_mode(clock: &dyn Clock, config: &PipeModeConfig) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let handle = stdin.lock();
    let mut out = stdout.lock();
    process_lines(handle, &mut out, clock, config)
}

fn process_lines<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    clock: &dyn Clock,
    config: &PipeModeConfig,
) -> io::Result<()> {
    for line_result in input.lines() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        let report = ExpressionReport::evaluate(&line, clock);
        if config.expired_only && !report.expired {
            continue;
        }

        if config.json {
            let json = serde_json::to_string(&report).map_err(io::Error::other)?;
            writeln!(out, "{}", json)?;
        } else {
            write!(out, "{}", report.render())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemshelf_core::FixedClock;
    use chrono::NaiveDate;

    fn run(input: &str, config: &PipeModeConfig) -> String {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        let mut out = Vec::new();
        process_lines(input.as_bytes(), &mut out, &clock, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_json_lines_skip_blank() {
        let config = PipeModeConfig {
            json: true,
            expired_only: false,
        };
        let output = run("15/06/2024\n\n2030\n", &config);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["input"], "15/06/2024");
        assert_eq!(first["expired"], true);
        assert_eq!(first["parsed"]["granularity"], "day");
    }

    #[test]
    fn test_expired_only() {
        let config = PipeModeConfig {
            json: true,
            expired_only: true,
        };
        let output = run("2019\n2030\nnot a date\n", &config);
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"2019\""));
    }
}
