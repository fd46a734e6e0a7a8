//! Installer module
//!
//! Drives a complete install: pre-flight, parameter resolution, host
//! preparation, the final confirmation and the installer invocation. Host
//! access goes through the context so the whole flow runs against test
//! doubles.

use log::info;

use crate::command_runner::{Executor, Invocation};
use crate::config_file::RunConfiguration;
use crate::dns::DnsLookup;
use crate::error::Result;
use crate::guard::GuardHarness;
use crate::hardware::HostProfile;
use crate::logic::params::{self, ResolveOptions, ResolvedConfiguration};
use crate::logic::preflight::{self, PreflightReport};
use crate::logic::sequencer;
use crate::prompt::Prompter;
use crate::theme;

/// Everything an install touches outside this process
pub struct InstallContext<'a> {
    pub host: &'a HostProfile,
    pub dns: &'a dyn DnsLookup,
    pub prompter: &'a mut dyn Prompter,
    pub executor: &'a mut dyn Executor,
}

/// How an install run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The installer was launched; its result is in its own log.
    /// `invocations` covers preparation, firewall and installer, in order.
    Invoked {
        resolved: ResolvedConfiguration,
        invocations: Vec<Invocation>,
    },
    /// Operator stopped at the final gate; these lines finish the job
    Declined {
        resolved: ResolvedConfiguration,
        fallback: Vec<String>,
    },
}

impl InstallOutcome {
    pub fn resolved(&self) -> &ResolvedConfiguration {
        match self {
            Self::Invoked { resolved, .. } | Self::Declined { resolved, .. } => resolved,
        }
    }
}

/// Run the pre-flight chain only
pub fn run_preflight_only(
    host: &HostProfile,
    dns: &dyn DnsLookup,
    prompter: &mut dyn Prompter,
    config: &RunConfiguration,
) -> Result<PreflightReport> {
    let mut harness = GuardHarness::new(config.noprompt, prompter);
    let report = preflight::run_preflight(host, dns, &mut harness, config.tuning)?;
    theme::success_strong("Pre-flight checks complete.");
    for decision in &report.decisions {
        theme::message(format!("  {:<22} {:?}", decision.check.to_string(), decision.verdict));
    }
    theme::message(format!("  {:<22} {}", "tuning profile", report.tuning));
    theme::blank();
    Ok(report)
}

/// Install Foreman with Katello on this host
pub fn run_install(ctx: InstallContext<'_>, config: &RunConfiguration) -> Result<InstallOutcome> {
    let InstallContext {
        host,
        dns,
        prompter,
        executor,
    } = ctx;

    theme::banner("Foreman Installation Script");

    let mut harness = GuardHarness::new(config.noprompt, prompter);
    let report = preflight::run_preflight(host, dns, &mut harness, config.tuning)?;

    let adjusted = RunConfiguration {
        tuning: report.tuning,
        ..config.clone()
    };
    let opts = ResolveOptions::for_install(config.mode, harness.noprompt());
    let resolved = params::resolve(&adjusted, &opts, harness.prompter())?;

    let stages = if resolved.mode.is_connected() {
        theme::message("Starting connected install of Foreman...");
        sequencer::connected_preparation(resolved.require_versions()?)
    } else {
        theme::message("Starting disconnected install of Foreman...");
        sequencer::disconnected_preparation()
    };
    theme::blank();

    let mut invocations = Vec::new();
    for stage in &stages {
        invocations.extend(stage.run(&mut *executor));
    }
    sequencer::print_kernel_hint();

    let gate = harness.evaluate(sequencer::final_gate())?;
    if !gate.proceeds() {
        info!("Final confirmation declined, printing manual steps");
        let fallback = sequencer::print_fallback(&resolved, executor.elevate());
        return Ok(InstallOutcome::Declined { resolved, fallback });
    }

    invocations.extend(sequencer::run_installation(&resolved, &mut *executor));
    Ok(InstallOutcome::Invoked {
        resolved,
        invocations,
    })
}
