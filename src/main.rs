//! foreman-setup - Main entry point
//!
//! Parses the command line, wires the real host (sysinfo, system resolver,
//! stdin, child processes) into the install and mirror flows and turns any
//! fatal error into a banner and a non-zero exit.

use log::{debug, error, info};
use std::path::Path;

use foreman_setup::cli::{Cli, Commands, InstallArgs, MirrorArgs};
use foreman_setup::command_runner::{needs_elevation, Executor, RecordingExecutor, SystemExecutor};
use foreman_setup::config_file::{ConfigOverrides, RunConfiguration};
use foreman_setup::dns::SystemDns;
use foreman_setup::error::{Result, SetupError};
use foreman_setup::hardware::HostProfile;
use foreman_setup::installer::{self, InstallContext, InstallOutcome};
use foreman_setup::mirror::{self, MirrorOptions, MirrorRequest};
use foreman_setup::process_guard;
use foreman_setup::prompt::StdinPrompter;
use foreman_setup::theme::{self, Styles};

/// Initialize the logger with appropriate settings
fn init_logger() {
    use env_logger::Builder;
    use std::io::Write;

    Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        // Operator output goes through the theme; the log stays quiet
        // unless RUST_LOG asks for more.
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}

fn main() {
    init_logger();
    info!("foreman-setup starting up");

    if let Err(e) = process_guard::install_signal_watcher() {
        log::warn!("Failed to initialize signal handlers: {}", e);
    }
    debug!("Signal handlers initialized");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed: {:?}", cli);

    if let Err(e) = run(cli) {
        error!("{}", e);
        report_fatal(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Install(args) => run_install(args, cli.noprompt, cli.dry_run),
        Commands::Mirror(args) => run_mirror(args, cli.noprompt, cli.dry_run),
        Commands::Preflight { tune } => {
            let config = RunConfiguration {
                noprompt: cli.noprompt,
                ..Default::default()
            }
            .with_overrides(&ConfigOverrides {
                tuning: Some(tune),
                ..Default::default()
            })?;
            let host = HostProfile::detect();
            let dns = SystemDns::new();
            let mut prompter = StdinPrompter;
            installer::run_preflight_only(&host, &dns, &mut prompter, &config)?;
            Ok(())
        }
        Commands::Validate { config } => validate(&config),
    }
}

fn make_executor(dry_run: bool) -> Box<dyn Executor> {
    if dry_run {
        info!("Dry-run mode enabled: commands will be printed, not run");
        Box::new(RecordingExecutor::dry_run(needs_elevation()))
    } else {
        Box::new(SystemExecutor::detect())
    }
}

fn run_install(args: InstallArgs, noprompt: bool, dry_run: bool) -> Result<()> {
    let base = match &args.config {
        Some(path) => {
            info!("Loading run configuration from {:?}", path);
            let loaded = RunConfiguration::load_from_file(path)?;
            loaded.validate()?;
            loaded
        }
        None => RunConfiguration::default(),
    };

    let config = base.with_overrides(&ConfigOverrides {
        organization: args.org,
        location: args.loc,
        admin_username: args.username,
        tuning: args.tune,
        foreman_version: args.foreman,
        katello_version: args.katello,
        compute_resource: args.compute_resource,
        disconnected: args.disconnected,
        noprompt,
    })?;

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        theme::success(format!("Run configuration saved to {}", path.display()));
    }

    let host = HostProfile::detect();
    let dns = SystemDns::new();
    let mut prompter = StdinPrompter;
    let mut executor = make_executor(dry_run);

    let outcome = installer::run_install(
        InstallContext {
            host: &host,
            dns: &dns,
            prompter: &mut prompter,
            executor: executor.as_mut(),
        },
        &config,
    )?;

    match outcome {
        InstallOutcome::Invoked { invocations, .. } => {
            for invocation in &invocations {
                debug!("{}", invocation.summary());
            }
        }
        InstallOutcome::Declined { .. } => info!("Install stopped at the final confirmation"),
    }
    Ok(())
}

fn run_mirror(args: MirrorArgs, noprompt: bool, dry_run: bool) -> Result<()> {
    let request = MirrorRequest {
        online: args.online,
        offline: args.offline,
        foreman_version: args.foreman,
        katello_version: args.katello,
        noprompt,
        options: MirrorOptions {
            workdir: args.workdir,
            archive: args.archive,
            destination: args.dest,
            ..Default::default()
        },
    };

    let host = HostProfile::detect();
    let mut prompter = StdinPrompter;
    let mut executor = make_executor(dry_run);
    let report = mirror::run_mirror(&host, &mut prompter, executor.as_mut(), &request)?;
    debug!("Mirror report: {:?}", report);
    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", path);
    let config = RunConfiguration::load_from_file(path)?;
    config.validate()?;
    theme::success(format!("Configuration file is valid: {}", path.display()));
    theme::plain(serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Boxed error banner plus remediation hint on stderr
fn report_fatal(err: &SetupError) {
    let style = Styles::failure_strong();
    eprintln!();
    for line in theme::framed(&err.to_string()) {
        eprintln!("{}", style.apply_to(line));
    }
    if let Some(hint) = err.hint() {
        eprintln!("{}", Styles::failure().apply_to(hint));
    }
    eprintln!();
}
