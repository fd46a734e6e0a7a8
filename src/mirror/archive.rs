//! Transport archive for the mirror
//!
//! The online host packs its work directory into an uncompressed tar whose
//! single top-level directory is the work directory's name, so unpacking it
//! into `/var/lib` yields `/var/lib/<workdir>`. Packages are already
//! compressed, so gzip buys little.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tar::{Archive, Builder};

/// Pack `workdir` into `archive_path` under the directory name `top_level`.
pub fn pack(workdir: &Path, top_level: &str, archive_path: &Path) -> Result<()> {
    let file = File::create(archive_path)
        .with_context(|| format!("Failed to create archive {:?}", archive_path))?;
    let mut builder = Builder::new(file);
    builder.follow_symlinks(false);
    builder
        .append_dir_all(top_level, workdir)
        .with_context(|| format!("Failed to add {:?} to archive", workdir))?;
    builder
        .into_inner()
        .with_context(|| format!("Failed to finish archive {:?}", archive_path))?;
    log::info!("Packed {:?} into {:?}", workdir, archive_path);
    Ok(())
}

/// Paths stored in an archive, in order
pub fn entries(archive_path: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive {:?}", archive_path))?;
    let mut archive = Archive::new(file);
    let mut paths = Vec::new();
    for entry in archive
        .entries()
        .with_context(|| format!("Failed to read archive {:?}", archive_path))?
    {
        let entry = entry.context("Corrupt archive entry")?;
        paths.push(entry.path().context("Invalid path in archive")?.into_owned());
    }
    Ok(paths)
}

/// Whether every entry lives under `top_level/` without leaving it
pub fn is_rooted_at(paths: &[PathBuf], top_level: &str) -> bool {
    !paths.is_empty()
        && paths.iter().all(|p| {
            p.starts_with(top_level)
                && p.components()
                    .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        })
}
