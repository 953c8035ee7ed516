//! Restrict the full ground-truth list to downloaded videos.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::download::GROUND_TRUTH_FILE;
use crate::manifest;
use crate::utils::{basename, read_json, write_json};

pub const FILTERED_FILE: &str = "ground_truth.json";

/// Keep, in input order, the entries whose `video_path` basename was
/// downloaded. Entries without a `video_path` string are dropped.
pub fn filter_ground_truth(entries: Vec<Value>, downloaded: &HashSet<String>) -> Vec<Value> {
    entries
        .into_iter()
        .filter(|entry| {
            entry
                .get("video_path")
                .and_then(Value::as_str)
                .is_some_and(|path| downloaded.contains(basename(path)))
        })
        .collect()
}

/// Filter `<dataset_dir>/fine_grained_labels.json` against the manifest and
/// write the subset to `<dataset_dir>/ground_truth.json`.
pub fn run(dataset_dir: &Path) -> Result<()> {
    let gt_path = dataset_dir.join(GROUND_TRUTH_FILE);
    let manifest_path = manifest::manifest_path(dataset_dir);
    if !gt_path.exists() || !manifest_path.exists() {
        warn!("required files missing, run the download step first");
        return Ok(());
    }

    let downloaded = manifest::basenames(&manifest::load(dataset_dir)?);
    let entries: Vec<Value> = read_json(&gt_path)?;
    info!("filtering {} ground truth entries", entries.len());

    let filtered = filter_ground_truth(entries, &downloaded);
    let out_path = dataset_dir.join(FILTERED_FILE);
    write_json(&out_path, &filtered)?;
    info!(
        "filtered ground truths: {} entries, saved to {}",
        filtered.len(),
        out_path.display()
    );
    Ok(())
}
