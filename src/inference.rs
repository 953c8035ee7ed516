//! Drive the external inference command over a dataset, logging one CSV row
//! per record with wall-time and memory measurements.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{info, warn};

use crate::conversations::TrainingRecord;
use crate::utils::read_json;

pub const INFER_BIN: &str = "vila-infer";
pub const CONV_MODE: &str = "vicuna_v1";
pub const EVAL_PROMPT: &str = "Please evaluate the exercise form shown. \
What mistakes, if any, are present, and what corrections would you recommend?";

const CSV_HEADER: [&str; 5] = [
    "video",
    "ground_truth",
    "model_output",
    "memory_usage_mb",
    "inference_time_sec",
];

/// Captured output plus resource measurements for one inference call.
#[derive(Debug)]
pub struct InferenceResult {
    pub model_output: String,
    pub memory_usage_mb: f64,
    pub inference_time_sec: f64,
}

/// Resident set size of this process in MB.
fn rss_mb(sys: &mut System, pid: Pid) -> f64 {
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys.process(pid)
        .map(|proc| proc.memory() as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

/// Invoke the inference executable synchronously and capture its stdout.
///
/// A spawn failure is logged and yields an empty output; the caller still
/// gets a row. Memory is the calling process's RSS delta across the call.
fn run_inference(
    sys: &mut System,
    pid: Pid,
    model_path: &str,
    text: &str,
    media: &str,
) -> InferenceResult {
    let start = Instant::now();
    let mem_before = rss_mb(sys, pid);

    let output = Command::new(INFER_BIN)
        .args(["--model-path", model_path])
        .args(["--conv-mode", CONV_MODE])
        .args(["--text", text])
        .args(["--media", media])
        .output();

    let mem_after = rss_mb(sys, pid);
    let model_output = match output {
        Ok(out) => String::from_utf8_lossy(&out.stdout).trim().to_string(),
        Err(err) => {
            warn!("failed to run {INFER_BIN}: {err}");
            String::new()
        }
    };

    InferenceResult {
        model_output,
        memory_usage_mb: mem_after - mem_before,
        inference_time_sec: start.elapsed().as_secs_f64(),
    }
}

/// Run inference over `input` and append one row per record to `csv_path`.
/// The header row is written only when the file did not already exist.
pub fn run(
    input: &Path,
    csv_path: &Path,
    model_path: &str,
    limit: Option<usize>,
) -> Result<usize> {
    let mut records: Vec<TrainingRecord> = read_json(input)?;
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    if let Some(parent) = csv_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let file_exists = csv_path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)
        .with_context(|| format!("opening {}", csv_path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if !file_exists {
        writer.write_record(CSV_HEADER)?;
    }

    let pid = Pid::from_u32(std::process::id());
    let mut sys = System::new();
    for record in &records {
        let result = run_inference(&mut sys, pid, model_path, EVAL_PROMPT, &record.video);
        writer.write_record([
            record.video.as_str(),
            record.ground_truth(),
            result.model_output.as_str(),
            format!("{:.2}", result.memory_usage_mb).as_str(),
            format!("{:.2}", result.inference_time_sec).as_str(),
        ])?;
        writer.flush()?;
        info!("processed {}", record.video);
    }
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversations::Turn;
    use crate::utils::write_json;
    use std::path::PathBuf;

    fn dataset(dir: &Path, count: usize) -> PathBuf {
        let records: Vec<TrainingRecord> = (0..count)
            .map(|i| TrainingRecord {
                video: format!("videos/clip{i}"),
                conversations: vec![Turn::human("prompt"), Turn::gpt(format!("truth {i}"))],
            })
            .collect();
        let path = dir.join("dataset.json");
        write_json(&path, &records).unwrap();
        path
    }

    fn csv_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn writes_header_once_and_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let input = dataset(dir.path(), 3);
        let csv_path = dir.path().join("results/results.csv");

        let processed = run(&input, &csv_path, "model", None).unwrap();
        assert_eq!(processed, 3);

        let lines = csv_lines(&csv_path);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert!(lines[1].starts_with("videos/clip0,truth 0,"));
    }

    #[test]
    fn rerun_appends_without_duplicating_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let input = dataset(dir.path(), 2);
        let csv_path = dir.path().join("results.csv");

        run(&input, &csv_path, "model", None).unwrap();
        run(&input, &csv_path, "model", None).unwrap();

        let lines = csv_lines(&csv_path);
        assert_eq!(lines.len(), 5);
        let headers = lines.iter().filter(|l| *l == &CSV_HEADER.join(",")).count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn limit_truncates_the_record_list() {
        let dir = tempfile::tempdir().unwrap();
        let input = dataset(dir.path(), 5);
        let csv_path = dir.path().join("results.csv");

        let processed = run(&input, &csv_path, "model", Some(2)).unwrap();
        assert_eq!(processed, 2);
        assert_eq!(csv_lines(&csv_path).len(), 3);
    }

    #[test]
    fn limit_larger_than_input_processes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let input = dataset(dir.path(), 2);
        let csv_path = dir.path().join("results.csv");

        let processed = run(&input, &csv_path, "model", Some(10)).unwrap();
        assert_eq!(processed, 2);
    }
}
