//! Shuffle a record list and split it into train/test subsets.

use std::path::Path;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use tracing::info;

use crate::utils::{read_json, write_json};

pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Shuffle `records` and split at `floor(len * ratio)`.
pub fn split_records<T, R: Rng + ?Sized>(
    mut records: Vec<T>,
    ratio: f64,
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    records.shuffle(rng);
    let split_at = ((records.len() as f64) * ratio) as usize;
    let split_at = split_at.min(records.len());
    let test = records.split_off(split_at);
    (records, test)
}

/// Split a JSON array into train/test files. Elements pass through
/// untouched; the shuffle uses an unseeded rng, so runs are not
/// reproducible.
pub fn run(input: &Path, train_path: &Path, test_path: &Path, ratio: f64) -> Result<(usize, usize)> {
    let records: Vec<Value> = read_json(input)?;
    let (train, test) = split_records(records, ratio, &mut rand::rng());
    write_json(train_path, &train)?;
    write_json(test_path, &test)?;
    info!("split into {} train / {} test records", train.len(), test.len());
    Ok((train.len(), test.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn split_sizes_use_floor() {
        let records: Vec<usize> = (0..10).collect();
        let (train, test) = split_records(records, 0.8, &mut rand::rng());
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let records: Vec<usize> = (0..7).collect();
        let (train, test) = split_records(records, 0.8, &mut rand::rng());
        assert_eq!(train.len(), 5);
        assert_eq!(test.len(), 2);
    }

    #[test]
    fn union_preserves_the_input_set() {
        let records: Vec<usize> = (0..50).collect();
        let (train, test) = split_records(records, 0.8, &mut rand::rng());
        let union: HashSet<usize> = train.into_iter().chain(test).collect();
        assert_eq!(union, (0..50).collect::<HashSet<usize>>());
    }

    #[test]
    fn empty_input_splits_into_empty_parts() {
        let (train, test) = split_records(Vec::<usize>::new(), 0.8, &mut rand::rng());
        assert!(train.is_empty());
        assert!(test.is_empty());
    }

    #[test]
    fn seeded_rng_makes_the_split_reproducible() {
        let records: Vec<usize> = (0..20).collect();
        let (train_one, test_one) =
            split_records(records.clone(), 0.8, &mut StdRng::seed_from_u64(1));
        let (train_two, test_two) = split_records(records, 0.8, &mut StdRng::seed_from_u64(1));
        assert_eq!(train_one, train_two);
        assert_eq!(test_one, test_two);
    }

    #[test]
    fn run_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("all.json");
        let train = dir.path().join("train.json");
        let test = dir.path().join("test.json");
        std::fs::write(&input, r#"[{"n": 1}, {"n": 2}, {"n": 3}, {"n": 4}, {"n": 5}]"#).unwrap();

        let (train_count, test_count) = run(&input, &train, &test, 0.8).unwrap();
        assert_eq!(train_count, 4);
        assert_eq!(test_count, 1);

        let train_back: Vec<Value> = read_json(&train).unwrap();
        let test_back: Vec<Value> = read_json(&test).unwrap();
        assert_eq!(train_back.len() + test_back.len(), 5);
    }
}
