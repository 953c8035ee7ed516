//! Validate a trainer-ready JSONL file against the conversation schema and
//! check that referenced videos exist on disk.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde_json::Value;

use crate::conversations::{GPT, HUMAN};

/// How many items of each bucket the report prints before eliding.
const REPORT_LIMIT: usize = 10;

/// Outcome of a verification run. The four buckets are independent; an
/// entry lands in at most one of them or in the valid count.
#[derive(Debug, Default)]
pub struct VerifyReport {
    pub total_entries: usize,
    pub valid_count: usize,
    pub parse_errors: Vec<String>,
    pub format_errors: Vec<String>,
    pub missing_videos: Vec<String>,
}

impl VerifyReport {
    /// Success needs clean parsing and every parsed entry valid, which can
    /// only hold with zero format errors and zero missing videos.
    pub fn is_valid(&self) -> bool {
        self.parse_errors.is_empty() && self.valid_count == self.total_entries
    }

    pub fn print(&self) {
        print_bucket("JSON parsing errors", &self.parse_errors);
        print_bucket("format errors", &self.format_errors);
        print_bucket("missing videos", &self.missing_videos);
        println!("valid entries: {}/{}", self.valid_count, self.total_entries);
        if self.is_valid() {
            println!("dataset is valid and ready for training");
        } else {
            println!("dataset has issues that need to be fixed");
        }
    }
}

fn print_bucket(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{title} ({}):", items.len());
    for item in items.iter().take(REPORT_LIMIT) {
        println!("  - {item}");
    }
    if items.len() > REPORT_LIMIT {
        println!("  ... and {} more", items.len() - REPORT_LIMIT);
    }
}

/// Verify every non-blank line of `jsonl_path` independently. Malformed
/// lines and invalid entries are accumulated, never fatal.
pub fn verify_dataset(jsonl_path: &Path, video_dir: &Path) -> Result<VerifyReport> {
    let text = fs::read_to_string(jsonl_path)
        .with_context(|| format!("reading {}", jsonl_path.display()))?;
    ensure!(
        video_dir.is_dir(),
        "video directory not found: {}",
        video_dir.display()
    );

    let mut report = VerifyReport::default();
    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry: Value = match serde_json::from_str(line) {
            Ok(entry) => entry,
            Err(err) => {
                report
                    .parse_errors
                    .push(format!("line {line_num}: invalid JSON: {err}"));
                continue;
            }
        };
        report.total_entries += 1;
        check_entry(line_num, &entry, video_dir, &mut report);
    }
    Ok(report)
}

fn check_entry(line_num: usize, entry: &Value, video_dir: &Path, report: &mut VerifyReport) {
    for field in ["id", "video", "conversations"] {
        if entry.get(field).is_none() {
            report
                .format_errors
                .push(format!("line {line_num}: missing '{field}' field"));
            return;
        }
    }

    let turns = entry["conversations"].as_array();
    let Some(turns) = turns.filter(|turns| turns.len() >= 2) else {
        report.format_errors.push(format!(
            "line {line_num}: 'conversations' must be a list with at least 2 turns"
        ));
        return;
    };

    let mut turns_ok = true;
    for (i, turn) in turns.iter().enumerate() {
        if turn.get("from").is_none() || turn.get("value").is_none() {
            report.format_errors.push(format!(
                "line {line_num}, turn {i}: missing 'from' or 'value' field"
            ));
            turns_ok = false;
            continue;
        }
        if !matches!(turn["from"].as_str(), Some(HUMAN) | Some(GPT)) {
            report.format_errors.push(format!(
                "line {line_num}, turn {i}: 'from' must be 'human' or 'gpt'"
            ));
            turns_ok = false;
        }
    }
    if !turns_ok {
        return;
    }

    let video = entry["video"].as_str().unwrap_or("");
    let video_path = video_dir.join(format!("{video}.mp4"));
    if !video_path.exists() {
        report.missing_videos.push(format!(
            "line {line_num}: video not found: {}",
            video_path.display()
        ));
        return;
    }
    report.valid_count += 1;
}
