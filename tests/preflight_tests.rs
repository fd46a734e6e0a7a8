//! Tests for the pre-flight chain
//!
//! Drive `run_preflight` and `run_preflight_only` against a fixed host
//! profile, static DNS answers and scripted operator input.

use std::net::{IpAddr, Ipv4Addr};

use foreman_setup::config_file::RunConfiguration;
use foreman_setup::dns::StaticDns;
use foreman_setup::error::SetupError;
use foreman_setup::guard::{GuardHarness, Verdict};
use foreman_setup::hardware::HostProfile;
use foreman_setup::installer::run_preflight_only;
use foreman_setup::logic::preflight::run_preflight;
use foreman_setup::prompt::ScriptedPrompter;
use foreman_setup::types::{CheckKind, TuningProfile};

const ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10));
const HOSTNAME: &str = "foreman.example.com";

fn host(cpu_cores: usize, memory_gb: u64) -> HostProfile {
    HostProfile {
        release: "4.18.0-513.el8.x86_64".to_string(),
        cpu_cores,
        memory_gb,
        hostname: HOSTNAME.to_string(),
        ip_address: ADDRESS,
        multiplexed: true,
    }
}

fn resolvable() -> StaticDns {
    StaticDns::new().with_host(HOSTNAME, ADDRESS)
}

// =============================================================================
// Resources and tuning
// =============================================================================

#[test]
fn test_development_host_passes_and_keeps_profile() {
    let mut prompter = ScriptedPrompter::silent();
    let mut harness = GuardHarness::new(false, &mut prompter);

    let report = run_preflight(&host(2, 8), &resolvable(), &mut harness, TuningProfile::Development)
        .unwrap();

    assert_eq!(report.tuning, TuningProfile::Development);
    assert_eq!(report.decisions.len(), 5);
    assert!(report.decisions.iter().all(|d| d.verdict == Verdict::Pass));
    assert_eq!(prompter.reads(), 0);
}

#[test]
fn test_short_host_is_downgraded_under_noprompt() {
    let mut prompter = ScriptedPrompter::silent();
    let mut harness = GuardHarness::new(true, &mut prompter);

    let report =
        run_preflight(&host(2, 10), &resolvable(), &mut harness, TuningProfile::Default).unwrap();

    assert_eq!(report.tuning, TuningProfile::Development);
    assert_eq!(report.verdict(CheckKind::Resources), Some(Verdict::Override));
    assert_eq!(report.overridden().collect::<Vec<_>>(), vec![CheckKind::Resources]);
    assert_eq!(prompter.reads(), 0);
}

#[test]
fn test_short_host_downgrade_accepted_interactively() {
    let mut prompter = ScriptedPrompter::new(["y"]);
    let mut harness = GuardHarness::new(false, &mut prompter);

    let report =
        run_preflight(&host(4, 16), &resolvable(), &mut harness, TuningProfile::Medium).unwrap();

    assert_eq!(report.tuning, TuningProfile::Development);
    assert_eq!(prompter.asked(), ["(Y/n): "]);
}

#[test]
fn test_short_host_downgrade_declined_aborts() {
    let mut prompter = ScriptedPrompter::new(["n"]);
    let mut harness = GuardHarness::new(false, &mut prompter);

    let err = run_preflight(&host(2, 10), &resolvable(), &mut harness, TuningProfile::Default)
        .unwrap_err();

    assert!(matches!(
        err,
        SetupError::Aborted {
            check: CheckKind::Resources
        }
    ));
}

#[test]
fn test_below_development_floor_is_fatal_even_with_noprompt() {
    let mut prompter = ScriptedPrompter::silent();
    let mut harness = GuardHarness::new(true, &mut prompter);

    let err = run_preflight(&host(2, 4), &resolvable(), &mut harness, TuningProfile::Default)
        .unwrap_err();

    match err {
        SetupError::InsufficientResources {
            memory_gb, cores, ..
        } => {
            assert_eq!(memory_gb, 4);
            assert_eq!(cores, 2);
        }
        other => panic!("Expected InsufficientResources, got {:?}", other),
    }
    assert_eq!(prompter.reads(), 0);
}

// =============================================================================
// Platform, multiplexer and DNS
// =============================================================================

#[test]
fn test_non_el8_kernel_is_fatal() {
    let mut prompter = ScriptedPrompter::new(["y"]);
    let mut harness = GuardHarness::new(false, &mut prompter);
    let mut h = host(8, 32);
    h.release = "5.14.0-362.el9.x86_64".to_string();

    let err = run_preflight(&h, &resolvable(), &mut harness, TuningProfile::Default).unwrap_err();

    assert!(matches!(err, SetupError::UnsupportedPlatform { .. }));
    // Fatal checks never ask
    assert_eq!(prompter.reads(), 0);
}

#[test]
fn test_forward_dns_failure_proceeds_to_reverse_under_noprompt() {
    let mut prompter = ScriptedPrompter::silent();
    let mut harness = GuardHarness::new(true, &mut prompter);
    let dns = StaticDns::new().with_reverse(ADDRESS, HOSTNAME);

    let report = run_preflight(&host(4, 20), &dns, &mut harness, TuningProfile::Default).unwrap();

    assert_eq!(report.verdict(CheckKind::ForwardDns), Some(Verdict::Override));
    assert_eq!(report.verdict(CheckKind::ReverseDns), Some(Verdict::Pass));
    assert_eq!(report.tuning, TuningProfile::Default);
}

#[test]
fn test_missing_multiplexer_declined_aborts_before_dns() {
    let mut prompter = ScriptedPrompter::new(["n"]);
    let mut harness = GuardHarness::new(false, &mut prompter);
    let mut h = host(4, 20);
    h.multiplexed = false;

    // No DNS records: reaching the DNS checks would need a second answer
    let err = run_preflight(&h, &StaticDns::new(), &mut harness, TuningProfile::Default)
        .unwrap_err();

    assert!(matches!(
        err,
        SetupError::Aborted {
            check: CheckKind::Multiplexer
        }
    ));
    assert_eq!(prompter.reads(), 1);
}

#[test]
fn test_unrecognized_answer_counts_as_no() {
    let mut prompter = ScriptedPrompter::new(["maybe"]);
    let mut harness = GuardHarness::new(false, &mut prompter);
    let dns = StaticDns::new().with_forward(HOSTNAME, ADDRESS);

    let err = run_preflight(&host(4, 20), &dns, &mut harness, TuningProfile::Default).unwrap_err();

    assert!(matches!(
        err,
        SetupError::Aborted {
            check: CheckKind::ReverseDns
        }
    ));
}

#[test]
fn test_preflight_only_uses_configured_noprompt() {
    let mut prompter = ScriptedPrompter::silent();
    let config = RunConfiguration {
        tuning: TuningProfile::Large,
        noprompt: true,
        ..Default::default()
    };

    let report =
        run_preflight_only(&host(8, 32), &StaticDns::new(), &mut prompter, &config).unwrap();

    assert_eq!(report.tuning, TuningProfile::Development);
    assert_eq!(
        report.overridden().collect::<Vec<_>>(),
        vec![CheckKind::Resources, CheckKind::ForwardDns, CheckKind::ReverseDns]
    );
}
