//! Pre-flight validation
//!
//! Runs the host checks in a fixed order through the guard harness:
//!
//! 1. platform identity (fatal)
//! 2. resource sufficiency for the requested tuning profile
//! 3. terminal multiplexer advisory
//! 4. forward DNS
//! 5. reverse DNS
//!
//! Each check only builds a [`CheckOutcome`]; the harness decides whether to
//! ask, accept or stop. A declined check aborts the run.
//!
//! The only state carried forward is the tuning profile, which the resource
//! check may lower to `development` and never raises.

use log::{info, warn};

use crate::dns::DnsLookup;
use crate::error::{Result, SetupError};
use crate::guard::{CheckOutcome, Failure, GuardDecision, GuardHarness, Verdict};
use crate::hardware::HostProfile;
use crate::theme;
use crate::types::{CheckKind, TuningProfile};

/// Kernel release marker for Enterprise Linux 8
pub const PLATFORM_MARKER: &str = "el8";

// ============================================================================
// Resource assessment
// ============================================================================

/// How a host measures up against a tuning profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAssessment {
    /// Meets the profile's minimums
    Sufficient,
    /// Short for the profile but big enough for development
    Degradable,
    /// Below the development floor
    Insufficient,
}

/// Compare host resources against `profile`.
pub fn assess_resources(profile: TuningProfile, cores: usize, memory_gb: u64) -> ResourceAssessment {
    let floor = TuningProfile::Development;
    let meets = |p: TuningProfile| cores >= p.min_cores() && memory_gb >= p.min_memory_gb();

    if meets(profile) {
        ResourceAssessment::Sufficient
    } else if !profile.is_development() && meets(floor) {
        ResourceAssessment::Degradable
    } else {
        ResourceAssessment::Insufficient
    }
}

// ============================================================================
// Individual checks
// ============================================================================

pub fn check_platform(release: &str) -> CheckOutcome {
    if release.contains(PLATFORM_MARKER) {
        return CheckOutcome::Pass(CheckKind::Platform);
    }
    CheckOutcome::Fail(
        Failure::fatal(
            CheckKind::Platform,
            "EL8 platform not detected!",
            SetupError::UnsupportedPlatform {
                release: release.to_string(),
            },
        )
        .detail(format!("Kernel release: {}", release)),
    )
}

pub fn check_resources(profile: TuningProfile, cores: usize, memory_gb: u64) -> CheckOutcome {
    let found = format!("Found {} core(s) and {} GB memory", cores, memory_gb);
    let wanted = format!(
        "The {} tuning profile needs {} core(s) and {} GB memory",
        profile,
        profile.min_cores(),
        profile.min_memory_gb()
    );

    match assess_resources(profile, cores, memory_gb) {
        ResourceAssessment::Sufficient => CheckOutcome::Pass(CheckKind::Resources),
        ResourceAssessment::Degradable => CheckOutcome::Fail(
            Failure::overridable(
                CheckKind::Resources,
                format!("Host does not meet minimum resources spec for {} tuning", profile),
            )
            .details([
                wanted,
                found,
                String::new(),
                "For dev deployment, we'll set tuning to development".to_string(),
            ])
            .question("Is this a development deployment?")
            .proceed_note("Assuming dev deployment, tuning set to development")
            .decline_note(format!(
                "Host does not meet the minimum resources for the {} tuning profile",
                profile
            )),
        ),
        ResourceAssessment::Insufficient => CheckOutcome::Fail(
            Failure::fatal(
                CheckKind::Resources,
                "Host does not meet minimum resources spec!",
                SetupError::InsufficientResources {
                    profile: profile.to_string(),
                    required_cores: profile.min_cores(),
                    required_memory_gb: profile.min_memory_gb(),
                    cores,
                    memory_gb,
                },
            )
            .details([
                wanted,
                found,
                format!(
                    "Even the development profile needs {} GB memory",
                    TuningProfile::Development.min_memory_gb()
                ),
            ]),
        ),
    }
}

pub fn check_multiplexer(multiplexed: bool) -> CheckOutcome {
    if multiplexed {
        return CheckOutcome::Pass(CheckKind::Multiplexer);
    }
    CheckOutcome::Fail(
        Failure::overridable(
            CheckKind::Multiplexer,
            "Session does not appear to be running in asynchronous method (i.e screen or tmux)",
        )
        .details([
            "Foreman installation can be time consuming",
            "It may not finish before remote session reaches idle timeout.",
        ])
        .question("Do you wish to proceed?")
        .proceed_note("Proceeding without screen/tmux"),
    )
}

fn dns_failure(check: CheckKind, headline: &str, reason: &str, host: &HostProfile) -> Failure {
    let record = match check {
        CheckKind::ReverseDns => "PTR",
        _ => "A",
    };
    Failure::overridable(check, headline)
        .detail(format!("Lookup error: {}", reason))
        .detail("Ensure hosts file has the following entry or install will fail:")
        .detail(String::new())
        .details(theme::framed(&host.hosts_entry()))
        .decline_note(format!(
            "Submit {} record in DNS server or configure hosts file with above entry",
            record
        ))
}

pub fn check_forward_dns(dns: &dyn DnsLookup, host: &HostProfile) -> CheckOutcome {
    match dns.forward(&host.hostname) {
        Ok(addrs) if !addrs.is_empty() => {
            info!("{} resolves to {:?}", host.hostname, addrs);
            CheckOutcome::Pass(CheckKind::ForwardDns)
        }
        Ok(_) => CheckOutcome::Fail(dns_failure(
            CheckKind::ForwardDns,
            "DNS lookup failed!",
            "no A records",
            host,
        )),
        Err(e) => {
            warn!("Forward lookup of {} failed: {}", host.hostname, e);
            CheckOutcome::Fail(dns_failure(
                CheckKind::ForwardDns,
                "DNS lookup failed!",
                &e.to_string(),
                host,
            ))
        }
    }
}

pub fn check_reverse_dns(dns: &dyn DnsLookup, host: &HostProfile) -> CheckOutcome {
    match dns.reverse(host.ip_address) {
        Ok(names) if !names.is_empty() => {
            info!("{} reverses to {:?}", host.ip_address, names);
            CheckOutcome::Pass(CheckKind::ReverseDns)
        }
        Ok(_) => CheckOutcome::Fail(dns_failure(
            CheckKind::ReverseDns,
            "Reverse DNS lookup failed!",
            "no PTR records",
            host,
        )),
        Err(e) => {
            warn!("Reverse lookup of {} failed: {}", host.ip_address, e);
            CheckOutcome::Fail(dns_failure(
                CheckKind::ReverseDns,
                "Reverse DNS lookup failed!",
                &e.to_string(),
                host,
            ))
        }
    }
}

// ============================================================================
// Chain
// ============================================================================

/// Outcome of a completed pre-flight run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightReport {
    /// Tuning profile to install with, possibly lowered to development
    pub tuning: TuningProfile,
    /// One decision per check, in order
    pub decisions: Vec<GuardDecision>,
}

impl PreflightReport {
    pub fn verdict(&self, check: CheckKind) -> Option<Verdict> {
        self.decisions
            .iter()
            .find(|d| d.check == check)
            .map(|d| d.verdict)
    }

    pub fn overridden(&self) -> impl Iterator<Item = CheckKind> + '_ {
        self.decisions
            .iter()
            .filter(|d| d.verdict == Verdict::Override)
            .map(|d| d.check)
    }
}

fn require(decision: GuardDecision) -> Result<GuardDecision> {
    if decision.proceeds() {
        Ok(decision)
    } else {
        theme::failure("Exiting...");
        theme::blank();
        Err(SetupError::Aborted {
            check: decision.check,
        })
    }
}

/// Run every pre-flight check in order.
pub fn run_preflight(
    host: &HostProfile,
    dns: &dyn DnsLookup,
    harness: &mut GuardHarness<'_>,
    profile: TuningProfile,
) -> Result<PreflightReport> {
    info!("Pre-flight for {} tuning on {}", profile, host);
    let mut decisions = Vec::with_capacity(5);

    decisions.push(require(harness.evaluate(check_platform(&host.release))?)?);

    let resources = require(harness.evaluate(check_resources(
        profile,
        host.cpu_cores,
        host.memory_gb,
    ))?)?;
    let tuning = match resources.verdict {
        Verdict::Override => {
            warn!("Tuning lowered from {} to development", profile);
            TuningProfile::Development
        }
        _ => profile,
    };
    decisions.push(resources);

    decisions.push(require(harness.evaluate(check_multiplexer(host.multiplexed))?)?);
    decisions.push(require(harness.evaluate(check_forward_dns(dns, host))?)?);
    decisions.push(require(harness.evaluate(check_reverse_dns(dns, host))?)?);

    Ok(PreflightReport { tuning, decisions })
}
