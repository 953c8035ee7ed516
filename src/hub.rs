//! Access to the remote dataset repository on the Hugging Face hub.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use hf_hub::api::sync::{ApiBuilder, ApiError, ApiRepo};
use hf_hub::{Repo, RepoType};

pub const VIDEO_EXT: &str = ".mp4";

/// A dataset repository handle over the sync hub API.
///
/// Fetches land in the shared hub cache; callers copy them wherever they
/// need. The token, when present, comes from `HF_TOKEN`.
pub struct DatasetRepo {
    repo: ApiRepo,
    id: String,
}

impl DatasetRepo {
    pub fn new(repo_id: &str) -> Result<Self> {
        let token = std::env::var("HF_TOKEN").ok();
        let api = ApiBuilder::new().with_token(token).build()?;
        let repo = api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Dataset,
            "main".to_string(),
        ));
        Ok(Self {
            repo,
            id: repo_id.to_string(),
        })
    }

    /// All file paths in the repository.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let info = self
            .repo
            .info()
            .with_context(|| format!("listing files of {}", self.id))?;
        Ok(info.siblings.into_iter().map(|s| s.rfilename).collect())
    }

    /// Fetch one file into the hub cache, returning the cached path.
    ///
    /// Returns the raw api error so callers can tell rate limits apart from
    /// other failures.
    pub fn fetch(&self, rel_path: &str) -> Result<PathBuf, ApiError> {
        self.repo.get(rel_path)
    }
}

/// Group video files by their top-level folder ("class").
///
/// Non-video files and files sitting at the repository root are skipped.
pub fn group_by_class(files: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut by_class: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in files {
        if !file.ends_with(VIDEO_EXT) {
            continue;
        }
        let mut parts = file.splitn(2, '/');
        let (Some(class), Some(_rest)) = (parts.next(), parts.next()) else {
            continue;
        };
        by_class
            .entry(class.to_string())
            .or_default()
            .push(file.clone());
    }
    by_class
}
