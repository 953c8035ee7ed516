use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::utils::{self, read_json, write_json};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Which files a download run produced: local path -> class label.
/// Append-only within a run, written once at the end.
pub type Manifest = BTreeMap<String, String>;

pub fn manifest_path(dataset_dir: &Path) -> PathBuf {
    dataset_dir.join(MANIFEST_FILE)
}

pub fn save(manifest: &Manifest, dataset_dir: &Path) -> Result<PathBuf> {
    let path = manifest_path(dataset_dir);
    write_json(&path, manifest)?;
    Ok(path)
}

pub fn load(dataset_dir: &Path) -> Result<Manifest> {
    read_json(&manifest_path(dataset_dir))
}

/// Basenames of all downloaded files, for membership checks against
/// ground-truth video paths.
pub fn basenames(manifest: &Manifest) -> HashSet<String> {
    manifest
        .keys()
        .map(|path| utils::basename(path).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = Manifest::new();
        manifest.insert("dataset/squat/0001.mp4".to_string(), "squat".to_string());
        manifest.insert("dataset/lunge/0002.mp4".to_string(), "lunge".to_string());

        save(&manifest, dir.path()).unwrap();
        let back = load(dir.path()).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn basenames_drop_directories() {
        let mut manifest = Manifest::new();
        manifest.insert("dataset/squat/0001.mp4".to_string(), "squat".to_string());
        manifest.insert("dataset/lunge/0002.mp4".to_string(), "lunge".to_string());

        let names = basenames(&manifest);
        assert!(names.contains("0001.mp4"));
        assert!(names.contains("0002.mp4"));
        assert_eq!(names.len(), 2);
    }
}
