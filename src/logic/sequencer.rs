//! Execution sequencing
//!
//! Builds the ordered command stages for preparing a host and installing
//! Foreman. Stages are plain data: the installer runs them through an
//! [`Executor`], the fallback path renders them for the operator, and tests
//! inspect them directly.
//!
//! # Stages
//!
//! | Mode | Preparation |
//! |------|-------------|
//! | connected | release packages + repositories, modules, update + installer package |
//! | disconnected | update, modules, installer package |
//!
//! Installation (both modes): firewall services, then `foreman-installer`.

use log::info;

use crate::command_runner::{Executor, Invocation};
use crate::command_traits::CommandLine;
use crate::commands::{DnfArgs, FirewallArgs, ForemanInstallerArgs, HostCommand};
use crate::guard::{CheckOutcome, Failure};
use crate::logic::params::{ResolvedConfiguration, Versions};
use crate::theme;
use crate::types::CheckKind;

pub const PUPPET_RELEASE_RPM: &str = "https://yum.puppet.com/puppet7-release-el-8.noarch.rpm";
pub const INSTALLER_PACKAGE: &str = "foreman-installer-katello";

/// Module streams switched before installing
pub const MODULE_SWITCHES: &[&str] = &["postgresql:12", "ruby:2.7"];
/// Module streams enabled before installing
pub const MODULE_ENABLES: &[&str] = &["katello:el8", "pulpcore:el8"];
/// Distribution repositories enabled for a connected install
pub const BASE_REPOS: &[&str] = &["appstream", "baseos"];

pub fn foreman_release_rpm(version: &str) -> String {
    format!(
        "https://yum.theforeman.org/releases/{}/el8/x86_64/foreman-release.rpm",
        version
    )
}

pub fn katello_repos_rpm(version: &str) -> String {
    format!(
        "https://yum.theforeman.org/katello/{}/katello/el8/x86_64/katello-repos-latest.rpm",
        version
    )
}

/// A titled group of commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Shown before the commands run
    pub title: &'static str,
    /// Shown after the last command returned
    pub done: &'static str,
    pub commands: Vec<HostCommand>,
}

impl Stage {
    /// Run every command in order. Exit statuses are logged by the
    /// executor and do not stop the stage.
    pub fn run(&self, executor: &mut dyn Executor) -> Vec<Invocation> {
        theme::message(self.title);
        theme::blank();
        let invocations = executor.execute_all(&self.commands);
        theme::success(self.done);
        theme::blank();
        invocations
    }
}

// ============================================================================
// Preparation
// ============================================================================

/// Release packages for Foreman, Katello and Puppet, plus base repositories
pub fn repository_stage(versions: &Versions) -> Stage {
    let mut commands: Vec<HostCommand> = vec![
        DnfArgs::install(foreman_release_rpm(&versions.foreman)).into(),
        DnfArgs::install(katello_repos_rpm(&versions.katello)).into(),
        DnfArgs::install(PUPPET_RELEASE_RPM).into(),
    ];
    commands.extend(BASE_REPOS.iter().map(|r| DnfArgs::enable_repo(*r).into()));
    Stage {
        title: "Configuring repositories...",
        done: "Repositories configured!",
        commands,
    }
}

fn module_commands() -> Vec<HostCommand> {
    MODULE_SWITCHES
        .iter()
        .map(|m| DnfArgs::module_switch(*m).into())
        .chain(MODULE_ENABLES.iter().map(|m| DnfArgs::module_enable(*m).into()))
        .collect()
}

pub fn module_stage() -> Stage {
    Stage {
        title: "Configuring DNF Modules...",
        done: "DNF Modules configured!",
        commands: module_commands(),
    }
}

pub fn package_stage() -> Stage {
    Stage {
        title: "Installing packages...",
        done: "Package installation complete!",
        commands: vec![
            DnfArgs::Update.into(),
            DnfArgs::install(INSTALLER_PACKAGE).into(),
        ],
    }
}

pub fn connected_preparation(versions: &Versions) -> Vec<Stage> {
    vec![repository_stage(versions), module_stage(), package_stage()]
}

/// Repositories come from the local mirror, so only update, modules and
/// the installer package remain.
pub fn disconnected_preparation() -> Vec<Stage> {
    let mut commands: Vec<HostCommand> = vec![DnfArgs::Update.into()];
    commands.extend(module_commands());
    commands.push(DnfArgs::install(INSTALLER_PACKAGE).into());
    vec![Stage {
        title: "Installing packages...",
        done: "Package installation complete!",
        commands,
    }]
}

// ============================================================================
// Installation
// ============================================================================

pub fn installer_args(resolved: &ResolvedConfiguration) -> ForemanInstallerArgs {
    ForemanInstallerArgs {
        tuning: resolved.tuning,
        location: resolved.location.clone(),
        organization: resolved.organization.clone(),
        admin_username: resolved.admin_username.clone(),
        compute_resource: resolved.compute_resource,
    }
}

pub fn firewall_commands() -> Vec<HostCommand> {
    vec![
        FirewallArgs::add_service("foreman").into(),
        FirewallArgs::add_service("foreman-proxy").into(),
        FirewallArgs::RuntimeToPermanent.into(),
    ]
}

/// Firewall rules followed by the installer invocation
pub fn installation_commands(resolved: &ResolvedConfiguration) -> Vec<HostCommand> {
    let mut commands = firewall_commands();
    commands.push(installer_args(resolved).into());
    commands
}

/// The last question before anything is installed
pub fn final_gate() -> CheckOutcome {
    CheckOutcome::Fail(
        Failure::overridable(CheckKind::FinalConfirmation, "Host is ready for Foreman Installation.")
            .question("Would you like to proceed?")
            .proceed_note("Proceeding with Foreman Installation!"),
    )
}

/// Copy-pasteable lines for commands the operator chose not to run
pub fn render_fallback(commands: &[HostCommand], elevate: bool) -> Vec<String> {
    commands
        .iter()
        .map(|c| CommandLine::build(c, elevate).render())
        .collect()
}

/// Advisory printed after the system update
pub fn print_kernel_hint() {
    theme::plain(format!(
        "{} {} {}",
        theme::Styles::message().apply_to("Run"),
        theme::emphasis("rpm -qa kernel --last"),
        theme::Styles::message().apply_to("to see if a reboot is needed.")
    ));
    theme::blank();
}

/// Run the installation commands and report where the installer logs.
///
/// The installer's exit status does not reliably reflect success, so the
/// outcome is only ever "invocation completed".
pub fn run_installation(
    resolved: &ResolvedConfiguration,
    executor: &mut dyn Executor,
) -> Vec<Invocation> {
    let commands = installation_commands(resolved);
    let (firewall, installer) = commands.split_at(commands.len() - 1);

    theme::message("Opening firewall for required services");
    let mut invocations = executor.execute_all(firewall);
    theme::blank();

    theme::message("Installing Foreman and Katello services");
    theme::blank();
    invocations.extend(executor.execute_all(installer));

    if let Some(last) = invocations.last() {
        info!("Installer invocation: {}", last.summary());
    }
    theme::success_strong("Foreman installer invocation completed.");
    theme::banner_text("See the following location for details:");
    theme::blank();
    for line in theme::framed(crate::commands::INSTALLER_LOG) {
        theme::plain(line);
    }
    theme::blank();
    invocations
}

/// Tell the operator how to finish by hand
pub fn print_fallback(resolved: &ResolvedConfiguration, elevate: bool) -> Vec<String> {
    let lines = render_fallback(&installation_commands(resolved), elevate);
    theme::warning(format!(
        "Host is setup for Foreman installation but foreman has {} been installed.",
        theme::Styles::failure().apply_to("NOT")
    ));
    theme::blank();
    theme::message("Execute the following to complete installation:");
    for line in &lines {
        theme::plain(line);
    }
    theme::blank();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_traits::CommandArgs;
    use crate::types::{ComputeResource, Mode, TuningProfile};

    fn versions() -> Versions {
        Versions {
            foreman: "3.5".into(),
            katello: "4.7".into(),
        }
    }

    fn resolved() -> ResolvedConfiguration {
        ResolvedConfiguration {
            organization: "ACME Corp".into(),
            location: "Lab".into(),
            admin_username: "admin".into(),
            tuning: TuningProfile::Development,
            versions: Some(versions()),
            compute_resource: Some(ComputeResource::Ec2),
            mode: Mode::Connected,
            noprompt: true,
        }
    }

    #[test]
    fn test_repository_stage_urls() {
        let stage = repository_stage(&versions());
        let rendered: Vec<String> = stage.commands.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            rendered[0],
            "dnf install -y https://yum.theforeman.org/releases/3.5/el8/x86_64/foreman-release.rpm"
        );
        assert_eq!(
            rendered[1],
            "dnf install -y https://yum.theforeman.org/katello/4.7/katello/el8/x86_64/katello-repos-latest.rpm"
        );
        assert_eq!(rendered[3], "dnf repolist --enablerepo appstream");
        assert_eq!(rendered[4], "dnf repolist --enablerepo baseos");
    }

    #[test]
    fn test_disconnected_updates_before_modules() {
        let stages = disconnected_preparation();
        assert_eq!(stages.len(), 1);
        let cmds = &stages[0].commands;
        assert_eq!(cmds.first(), Some(&HostCommand::Dnf(DnfArgs::Update)));
        assert_eq!(
            cmds.last(),
            Some(&HostCommand::Dnf(DnfArgs::install(INSTALLER_PACKAGE)))
        );
        assert_eq!(cmds.len(), 6);
    }

    #[test]
    fn test_installation_ends_with_installer() {
        let cmds = installation_commands(&resolved());
        assert_eq!(cmds.len(), 4);
        assert!(cmds[3].is_installer());
        assert_eq!(cmds[3].to_cli_args().last().unwrap(), "--enable-foreman-compute-ec2");
    }

    #[test]
    fn test_fallback_is_escaped() {
        let lines = render_fallback(&installation_commands(&resolved()), true);
        assert_eq!(lines[0], "sudo firewall-cmd --add-service foreman");
        assert!(lines[3].contains("--foreman-initial-organization 'ACME Corp'"));
        assert!(lines[3].contains("--foreman-initial-location Lab"));
    }
}
