//! foreman-setup Library
//!
//! Pre-flight checks, parameter resolution, host preparation and the
//! repository mirror builder behind the `foreman-setup` binary.

pub mod cli;
pub mod command_runner;
pub mod command_traits;
pub mod commands;
pub mod config_file;
pub mod dns;
pub mod error;
pub mod guard;
pub mod hardware;
pub mod installer;
pub mod logic;
pub mod mirror;
pub mod process_guard;
pub mod prompt;
pub mod theme;
pub mod types;

// Re-export commonly used types
pub use command_runner::{Executor, Invocation, RecordingExecutor, SystemExecutor};
pub use command_traits::{CommandArgs, CommandLine};
pub use commands::HostCommand;
pub use config_file::{ConfigOverrides, RunConfiguration};
pub use dns::{DnsLookup, StaticDns, SystemDns};
pub use error::SetupError;
pub use guard::{CheckOutcome, Failure, GuardHarness, Verdict};
pub use hardware::HostProfile;
pub use installer::{run_install, run_preflight_only, InstallContext, InstallOutcome};
pub use mirror::{run_mirror, MirrorOptions, MirrorReport, MirrorRequest};
pub use process_guard::{ChildTracker, TrackedChild};
pub use prompt::{Prompter, ScriptedPrompter, StdinPrompter};
pub use types::{CheckKind, ComputeResource, Mode, TuningProfile};

// Pre-flight and resolution (used by integration tests and the binary)
pub use logic::params::{resolve, ResolveOptions, ResolvedConfiguration, Versions};
pub use logic::preflight::{run_preflight, PreflightReport};
