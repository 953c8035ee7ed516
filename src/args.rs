use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::download::{DEFAULT_MAX_PER_CLASS, DEFAULT_SEED};
use crate::split::DEFAULT_TRAIN_RATIO;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Dataset preparation and inference logging for video-language fine-tuning"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sample and download videos from a hub dataset repository
    Download {
        /// Hub dataset repository in <org>/<name> format
        repo: String,
        /// Local dataset directory
        local_dir: PathBuf,
        /// Maximum number of videos sampled per class
        #[arg(default_value_t = DEFAULT_MAX_PER_CLASS)]
        max_per_class: usize,
        /// Sampling seed, applied once for the whole run
        #[arg(default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Restrict the ground-truth labels file to downloaded videos
    FilterGt {
        /// Directory holding fine_grained_labels.json and manifest.json
        dataset_dir: PathBuf,
    },
    /// Convert raw annotation records to the chat training schema
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
    /// Shuffle a dataset and split it into train/test files
    Split {
        input: PathBuf,
        train: PathBuf,
        test: PathBuf,
        /// Fraction of records assigned to the train split
        #[arg(default_value_t = DEFAULT_TRAIN_RATIO)]
        ratio: f64,
    },
    /// Copy class-foldered videos into a single flat directory
    Collect {
        source_root: PathBuf,
        target_videos_dir: PathBuf,
    },
    /// Check a trainer-ready JSONL file and its video files
    Verify {
        jsonl: PathBuf,
        video_dir: PathBuf,
    },
    /// Run the external inference command over a dataset, logging to CSV
    Infer {
        input: PathBuf,
        output_csv: PathBuf,
        model_path: String,
        /// Process at most this many records
        limit: Option<usize>,
    },
}
