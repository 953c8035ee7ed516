//! Convert raw annotation records into two-turn training records.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::conversations::{RawRecord, TrainingRecord, Turn};
use crate::utils::{read_json, write_json};

/// Where the trainer expects videos to live, relative to its data root.
pub const DATASET_ROOT: &str = "llava/data/registry/datasets/dataset/videos/";

/// Fixed human turn of every converted record.
pub const FEEDBACK_PROMPT: &str = "Give some feedback about this exercise";

pub fn to_training_record(raw: &RawRecord) -> TrainingRecord {
    let video = raw.video_ref();
    let video = video.strip_prefix("./").unwrap_or(video);
    TrainingRecord {
        video: format!("{DATASET_ROOT}{video}"),
        conversations: vec![
            Turn::human(FEEDBACK_PROMPT),
            Turn::gpt(raw.labels_descriptive.joined()),
        ],
    }
}

pub fn convert_records(raw: &[RawRecord]) -> Vec<TrainingRecord> {
    raw.iter().map(to_training_record).collect()
}

pub fn run(input: &Path, output: &Path) -> Result<usize> {
    let raw: Vec<RawRecord> = read_json(input)?;
    let converted = convert_records(&raw);
    write_json(output, &converted)?;
    info!("converted {} records to {}", converted.len(), output.display());
    Ok(converted.len())
}
