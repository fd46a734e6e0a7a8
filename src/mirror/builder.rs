//! Mirror builder flows
//!
//! Online: register the upstream repositories, sync them into the work
//! directory, collect GPG keys and pack everything into a tar archive.
//!
//! Offline: unpack the archive, retire existing repository files and
//! install definitions that point at the unpacked mirror.
//!
//! Privileged work (unpacking into `/var/lib`, touching `/etc/yum.repos.d`)
//! goes through the executor so it is elevated, logged and skipped under
//! `--dry-run`. Writes into the operator's own directories happen in-process.

use anyhow::Context;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::command_runner::Executor;
use crate::commands::{
    ChownRootArgs, CreaterepoArgs, DnfArgs, ExtractArchiveArgs, FetchArgs, HostCommand, MoveArgs,
    ReposyncArgs, RestoreconArgs, RetireRepoFilesArgs,
};
use crate::error::{Result, SetupError};
use crate::logic::params::Versions;
use crate::logic::sequencer::{self, Stage};
use crate::mirror::archive;
use crate::mirror::repo_files::{self, MIRRORED_REPOS};
use crate::theme;

pub const DEFAULT_WORKDIR: &str = "foreman-repos";
pub const DEFAULT_ARCHIVE: &str = "foreman-repos.tar";
pub const DEFAULT_DESTINATION: &str = "/var/lib";
pub const YUM_REPOS_DIR: &str = "/etc/yum.repos.d";
pub const RPM_GPG_DIR: &str = "/etc/pki/rpm-gpg";
pub const STAGING_DIR: &str = "foreman-repo-files";

/// Paths used by both sides of the mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOptions {
    /// Directory repositories are synced into (online side)
    pub workdir: PathBuf,
    /// Archive written on the online side and read on the offline side
    pub archive: PathBuf,
    /// Where the archive is unpacked on the offline side
    pub destination: PathBuf,
    pub repos_dir: PathBuf,
    pub gpg_dir: PathBuf,
    /// Repository files are rendered here before being moved into place
    pub staging_dir: PathBuf,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from(DEFAULT_WORKDIR),
            archive: PathBuf::from(DEFAULT_ARCHIVE),
            destination: PathBuf::from(DEFAULT_DESTINATION),
            repos_dir: PathBuf::from(YUM_REPOS_DIR),
            gpg_dir: PathBuf::from(RPM_GPG_DIR),
            staging_dir: PathBuf::from(STAGING_DIR),
        }
    }
}

impl MirrorOptions {
    /// Name of the archive's top-level directory
    pub fn top_level(&self) -> String {
        self.workdir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_WORKDIR.to_string())
    }

    /// Where the mirror ends up on the offline host
    pub fn mirror_root(&self) -> PathBuf {
        self.destination.join(self.top_level())
    }
}

/// What a mirror run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// Archive written (online) or unpacked (offline)
    pub archive: PathBuf,
    /// GPG key files placed in the work directory
    pub keys_collected: Vec<String>,
    /// Repository files installed
    pub repo_files: Vec<PathBuf>,
}

// ============================================================================
// Online side
// ============================================================================

/// Sync tools, one reposync per repository, then createrepo for each
pub fn sync_stage(workdir: &Path) -> Stage {
    let mut commands: Vec<HostCommand> = vec![
        DnfArgs::install("yum-utils").into(),
        DnfArgs::install("createrepo").into(),
    ];
    commands.extend(MIRRORED_REPOS.iter().map(|id| {
        ReposyncArgs {
            repo_id: id.to_string(),
            download_path: workdir.to_path_buf(),
        }
        .into()
    }));
    commands.extend(MIRRORED_REPOS.iter().map(|id| {
        CreaterepoArgs {
            directory: workdir.join(id),
        }
        .into()
    }));
    Stage {
        title: "Syncing repos...",
        done: "Repo sync complete!",
        commands,
    }
}

/// Download, sync and pack the mirror on an internet-connected host.
pub fn run_online(
    opts: &MirrorOptions,
    versions: &Versions,
    executor: &mut dyn Executor,
) -> Result<MirrorReport> {
    theme::message("Configuring online repositories...");
    theme::blank();
    sequencer::repository_stage(versions).run(&mut *executor);
    sequencer::module_stage().run(&mut *executor);

    if !executor.is_dry_run() {
        fs::create_dir_all(&opts.workdir)
            .with_context(|| format!("Failed to create work directory {:?}", opts.workdir))?;
    }
    sync_stage(&opts.workdir).run(&mut *executor);

    theme::message("Packaging offline repos...");
    let keys_collected = collect_gpg_keys(opts, executor)?;

    if executor.is_dry_run() {
        theme::warning(format!(
            "[DRY RUN] pack {} into {}",
            opts.workdir.display(),
            opts.archive.display()
        ));
    } else {
        archive::pack(&opts.workdir, &opts.top_level(), &opts.archive)?;
    }
    theme::success("Repos packaged!");
    theme::message(format!("Tarball located at {}", opts.archive.display()));
    theme::prompt_line(
        "Bring the tarball and this tool over to the disconnected host and run \
         `foreman-setup mirror --offline` to install or update Foreman",
    );
    theme::blank();

    Ok(MirrorReport {
        archive: opts.archive.clone(),
        keys_collected,
        repo_files: Vec::new(),
    })
}

/// Fetch the pulpcore key named by the installed `katello.repo` and copy
/// the distribution keys into the work directory.
fn collect_gpg_keys(opts: &MirrorOptions, executor: &mut dyn Executor) -> Result<Vec<String>> {
    let mut collected = Vec::new();

    let katello_repo = opts.repos_dir.join("katello.repo");
    match fs::read_to_string(&katello_repo) {
        Ok(content) => match repo_files::pulpcore_key_url(&content) {
            Some(url) => {
                executor.execute(
                    &FetchArgs {
                        url,
                        destination: opts.workdir.clone(),
                    }
                    .into(),
                );
                collected.push(repo_files::PULPCORE_KEY.to_string());
            }
            None => warn!("No pulpcore GPG key listed in {:?}", katello_repo),
        },
        Err(e) => {
            warn!("Cannot read {:?}: {}", katello_repo, e);
            theme::warning(format!(
                "{} not readable, pulpcore GPG key not collected",
                katello_repo.display()
            ));
        }
    }

    let keys = match fs::read_dir(&opts.gpg_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {:?}: {}", opts.gpg_dir, e);
            return Ok(collected);
        }
    };
    for entry in keys {
        let entry = entry.with_context(|| format!("Failed to list {:?}", opts.gpg_dir))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let target = opts.workdir.join(&name);
        if executor.is_dry_run() {
            theme::warning(format!(
                "[DRY RUN] copy {} to {}",
                entry.path().display(),
                target.display()
            ));
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy GPG key {:?}", entry.path()))?;
        }
        collected.push(name);
    }
    collected.sort();
    info!("GPG keys collected: {:?}", collected);
    Ok(collected)
}

// ============================================================================
// Offline side
// ============================================================================

/// Write the repository files into the staging directory; returns their
/// staged paths in file order.
pub fn stage_repo_files(opts: &MirrorOptions, versions: &Versions) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&opts.staging_dir)
        .with_context(|| format!("Failed to create staging directory {:?}", opts.staging_dir))?;
    let mut staged = Vec::new();
    for file in repo_files::repo_files(&opts.mirror_root(), versions) {
        let path = opts.staging_dir.join(file.file_name);
        fs::write(&path, file.render())
            .with_context(|| format!("Failed to write {:?}", path))?;
        staged.push(path);
    }
    Ok(staged)
}

/// Unpack the mirror and point dnf at it on a disconnected host.
pub fn run_offline(
    opts: &MirrorOptions,
    versions: &Versions,
    executor: &mut dyn Executor,
) -> Result<MirrorReport> {
    theme::message("Configuring offline repositories...");
    theme::blank();

    let top_level = opts.top_level();
    if !executor.is_dry_run() {
        let paths = archive::entries(&opts.archive)?;
        if !archive::is_rooted_at(&paths, &top_level) {
            return Err(SetupError::general(format!(
                "Archive {} does not contain a single {} directory",
                opts.archive.display(),
                top_level
            )));
        }
    }

    executor.execute(
        &ExtractArchiveArgs {
            archive: opts.archive.clone(),
            destination: opts.destination.clone(),
        }
        .into(),
    );
    executor.execute(
        &RetireRepoFilesArgs {
            directory: opts.repos_dir.clone(),
        }
        .into(),
    );

    let file_names: Vec<&str> = repo_files::repo_files(&opts.mirror_root(), versions)
        .iter()
        .map(|f| f.file_name)
        .collect();
    let staged: Vec<PathBuf> = if executor.is_dry_run() {
        file_names.iter().map(|n| opts.staging_dir.join(n)).collect()
    } else {
        stage_repo_files(opts, versions)?
    };
    let installed: Vec<PathBuf> = file_names.iter().map(|n| opts.repos_dir.join(n)).collect();

    let commands: Vec<HostCommand> = vec![
        MoveArgs {
            sources: staged,
            destination: opts.repos_dir.clone(),
        }
        .into(),
        RestoreconArgs {
            paths: installed.clone(),
        }
        .into(),
        ChownRootArgs {
            paths: installed.clone(),
        }
        .into(),
    ];
    executor.execute_all(&commands);
    if !executor.is_dry_run() {
        // Only removes the directory if the move emptied it
        let _ = fs::remove_dir(&opts.staging_dir);
    }

    theme::blank();
    theme::message("Checking repos...");
    executor.execute(&DnfArgs::RepoList.into());
    theme::success("Repos check complete!");
    theme::message("Repos are setup, run `foreman-setup install --disconnected` to complete setup");
    theme::blank();

    Ok(MirrorReport {
        archive: opts.archive.clone(),
        keys_collected: Vec::new(),
        repo_files: installed,
    })
}
