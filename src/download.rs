//! Sample and download videos per class, recording a manifest.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::hub::{self, DatasetRepo};
use crate::manifest::{self, Manifest};
use crate::retry::{is_rate_limit, RetryPolicy};
use crate::utils::basename;

pub const GROUND_TRUTH_FILE: &str = "fine_grained_labels.json";
pub const DEFAULT_MAX_PER_CLASS: usize = 100;
pub const DEFAULT_SEED: u64 = 42;

/// Draw `min(available, max_per_class)` items per class without
/// replacement. One rng covers all classes in sequence, so a fixed seed
/// makes the whole plan deterministic.
pub fn plan_sample<R: Rng + ?Sized>(
    by_class: &BTreeMap<String, Vec<String>>,
    max_per_class: usize,
    rng: &mut R,
) -> Vec<(String, Vec<String>)> {
    by_class
        .iter()
        .map(|(class, vids)| {
            let take = vids.len().min(max_per_class);
            let sample: Vec<String> = vids.choose_multiple(rng, take).cloned().collect();
            (class.clone(), sample)
        })
        .collect()
}

/// Download a sampled subset of `repo_id` into `local_dir`.
///
/// Rate-limited fetches sleep and retry per `policy`; any other fetch
/// failure is logged and the item skipped. Ends by writing the manifest and
/// fetching the complete ground-truth labels file.
pub fn run(
    repo_id: &str,
    local_dir: &Path,
    max_per_class: usize,
    seed: u64,
    policy: RetryPolicy,
) -> Result<Manifest> {
    fs::create_dir_all(local_dir)
        .with_context(|| format!("creating {}", local_dir.display()))?;

    let repo = DatasetRepo::new(repo_id)?;
    info!("listing repo files from {repo_id}");
    let files = repo.list_files()?;
    let by_class = hub::group_by_class(&files);
    info!("found {} classes with video files", by_class.len());

    let mut rng = StdRng::seed_from_u64(seed);
    let plan = plan_sample(&by_class, max_per_class, &mut rng);

    let total: usize = plan.iter().map(|(_, sample)| sample.len()).sum();
    let style = ProgressStyle::with_template(
        "Downloading: [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7}",
    )
    .expect("Invalid progress style");
    let pb = ProgressBar::new(total as u64);
    pb.set_style(style);

    let mut downloaded = Manifest::new();
    for (class, sample) in &plan {
        let class_dir = local_dir.join(class);
        fs::create_dir_all(&class_dir)
            .with_context(|| format!("creating {}", class_dir.display()))?;
        info!(
            "{class}: {} sampled of {} available",
            sample.len(),
            by_class[class].len()
        );

        for rel_path in sample {
            pb.inc(1);
            let fetched = policy.run(
                || repo.fetch(rel_path),
                |err| {
                    let rate_limited = is_rate_limit(err);
                    if rate_limited {
                        warn!("rate limit hit, waiting before retrying {rel_path}");
                    }
                    rate_limited
                },
            );
            let cached = match fetched {
                Ok(path) => path,
                Err(err) => {
                    warn!("failed to fetch {rel_path}: {err}");
                    continue;
                }
            };
            let target = class_dir.join(basename(rel_path));
            fs::copy(&cached, &target)
                .with_context(|| format!("copying into {}", target.display()))?;
            downloaded.insert(target.display().to_string(), class.clone());
        }
    }
    pb.finish_and_clear();
    info!("download complete: {} videos", downloaded.len());

    let manifest_path = manifest::save(&downloaded, local_dir)?;
    info!("manifest saved to {}", manifest_path.display());
    fetch_ground_truth(&repo, &files, local_dir);
    Ok(downloaded)
}

/// Fetch the complete ground-truth labels file, when the repository has
/// one. Failure is not fatal; the filtering step warns about the gap.
fn fetch_ground_truth(repo: &DatasetRepo, files: &[String], local_dir: &Path) -> Option<PathBuf> {
    let Some(remote) = files.iter().find(|f| f.ends_with(GROUND_TRUTH_FILE)) else {
        warn!("no {GROUND_TRUTH_FILE} found in repo");
        return None;
    };
    let cached = match repo.fetch(remote) {
        Ok(path) => path,
        Err(err) => {
            warn!("failed to download {GROUND_TRUTH_FILE}: {err}");
            return None;
        }
    };
    let target = local_dir.join(GROUND_TRUTH_FILE);
    match fs::copy(&cached, &target) {
        Ok(_) => {
            info!("ground truth file downloaded to {}", target.display());
            Some(target)
        }
        Err(err) => {
            warn!("failed to copy {GROUND_TRUTH_FILE}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(class: &str, count: usize) -> Vec<String> {
        (0..count).map(|i| format!("{class}/{i:08}.mp4")).collect()
    }

    #[test]
    fn caps_each_class_at_max_per_class() {
        let mut by_class = BTreeMap::new();
        by_class.insert("a".to_string(), listing("a", 3));
        by_class.insert("b".to_string(), listing("b", 150));

        let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
        let plan = plan_sample(&by_class, 100, &mut rng);

        let counts: BTreeMap<&str, usize> = plan
            .iter()
            .map(|(class, sample)| (class.as_str(), sample.len()))
            .collect();
        assert_eq!(counts["a"], 3);
        assert_eq!(counts["b"], 100);
    }

    #[test]
    fn samples_without_replacement_from_the_listing() {
        let mut by_class = BTreeMap::new();
        by_class.insert("a".to_string(), listing("a", 50));

        let mut rng = StdRng::seed_from_u64(7);
        let plan = plan_sample(&by_class, 20, &mut rng);
        let sample = &plan[0].1;

        let unique: std::collections::HashSet<&String> = sample.iter().collect();
        assert_eq!(unique.len(), sample.len());
        for item in sample {
            assert!(by_class["a"].contains(item));
        }
    }

    #[test]
    fn same_seed_same_plan() {
        let mut by_class = BTreeMap::new();
        by_class.insert("a".to_string(), listing("a", 40));
        by_class.insert("b".to_string(), listing("b", 40));

        let mut rng_one = StdRng::seed_from_u64(DEFAULT_SEED);
        let mut rng_two = StdRng::seed_from_u64(DEFAULT_SEED);
        assert_eq!(
            plan_sample(&by_class, 10, &mut rng_one),
            plan_sample(&by_class, 10, &mut rng_two)
        );
    }
}
