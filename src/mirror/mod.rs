//! Repository mirror for disconnected installs
//!
//! - `repo_files` - repository definitions pointing at the unpacked mirror
//! - `archive` - tar packing and inspection
//! - `builder` - the online and offline flows

pub mod archive;
pub mod builder;
pub mod repo_files;

use log::info;

use crate::command_runner::Executor;
use crate::config_file::RunConfiguration;
use crate::error::Result;
use crate::guard::GuardHarness;
use crate::hardware::HostProfile;
use crate::logic::mode;
use crate::logic::params::{self, ResolveOptions};
use crate::logic::preflight;
use crate::prompt::Prompter;
use crate::theme;
use crate::types::Mode;

pub use builder::{MirrorOptions, MirrorReport};

/// What the operator asked the mirror builder to do
#[derive(Debug, Clone, Default)]
pub struct MirrorRequest {
    pub online: bool,
    pub offline: bool,
    pub foreman_version: Option<String>,
    pub katello_version: Option<String>,
    pub noprompt: bool,
    pub options: MirrorOptions,
}

/// Build (online) or install (offline) the repository mirror
pub fn run_mirror(
    host: &HostProfile,
    prompter: &mut dyn Prompter,
    executor: &mut dyn Executor,
    request: &MirrorRequest,
) -> Result<MirrorReport> {
    theme::banner("Foreman Repo Setup Script");

    let mut harness = GuardHarness::new(request.noprompt, prompter);
    harness.evaluate(preflight::check_platform(&host.release))?;

    let mode = mode::select_mode(request.online, request.offline)?;

    let config = RunConfiguration {
        foreman_version: request.foreman_version.clone(),
        katello_version: request.katello_version.clone(),
        mode,
        noprompt: request.noprompt,
        ..Default::default()
    };
    let resolved = params::resolve(
        &config,
        &ResolveOptions::for_mirror(request.noprompt),
        harness.prompter(),
    )?;
    let versions = resolved.require_versions()?;
    info!(
        "Mirror {} for Foreman {} / Katello {}",
        mode, versions.foreman, versions.katello
    );

    let report = match mode {
        Mode::Connected => builder::run_online(&request.options, versions, executor)?,
        Mode::Disconnected => builder::run_offline(&request.options, versions, executor)?,
    };
    theme::success_strong("Offline repo setup complete");
    Ok(report)
}
