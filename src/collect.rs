//! Flatten class-foldered videos into a single directory for the trainer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::hub::VIDEO_EXT;

/// Copy every `.mp4` under the class subfolders of `source_root` into
/// `target_dir` (flat). A subfolder named like the target directory itself
/// is skipped so a target nested under the source is not re-copied.
pub fn run(source_root: &Path, target_dir: &Path) -> Result<usize> {
    fs::create_dir_all(target_dir)
        .with_context(|| format!("creating {}", target_dir.display()))?;
    let target_name = target_dir.file_name();

    let mut copied = 0usize;
    for entry in fs::read_dir(source_root)
        .with_context(|| format!("reading {}", source_root.display()))?
    {
        let entry = entry?;
        let class_dir = entry.path();
        if !class_dir.is_dir() || target_name == Some(entry.file_name().as_os_str()) {
            continue;
        }
        for file in fs::read_dir(&class_dir)
            .with_context(|| format!("reading {}", class_dir.display()))?
        {
            let file = file?;
            let name = file.file_name();
            if !name.to_string_lossy().ends_with(VIDEO_EXT) {
                continue;
            }
            let src = file.path();
            let dst = target_dir.join(&name);
            fs::copy(&src, &dst)
                .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
            debug!("copied {} to {}", src.display(), dst.display());
            copied += 1;
        }
    }
    info!("copied {copied} videos into {}", target_dir.display());
    Ok(copied)
}
