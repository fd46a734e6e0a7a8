//! Host command execution
//!
//! Every external program goes through an [`Executor`]. The system executor
//! runs commands with the terminal attached (dnf and foreman-installer are
//! interactive and long-running), registers each child for signal cleanup,
//! and logs the exit status without acting on it. A command that fails
//! keeps the sequence going; the operator sees the tool's own output.
//!
//! [`RecordingExecutor`] records instead of running. It backs `--dry-run`
//! and is the test double for every sequence in the crate.

use std::process::Command;

use log::{error, info, warn};

use crate::command_traits::CommandLine;
use crate::commands::HostCommand;
use crate::process_guard::{CommandLifecycle, TrackedChild};
use crate::theme;

/// What happened to one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: CommandLine,
    /// Exit code, `None` if not launched or killed by a signal
    pub exit_code: Option<i32>,
    pub launched: bool,
    pub dry_run: bool,
}

impl Invocation {
    pub fn summary(&self) -> String {
        match (self.dry_run, self.launched, self.exit_code) {
            (true, _, _) => format!("{} (dry run)", self.command),
            (false, false, _) => format!("{} (could not be started)", self.command),
            (false, true, Some(code)) => format!("{} (exit code {})", self.command, code),
            (false, true, None) => format!("{} (terminated by signal)", self.command),
        }
    }
}

/// Runs host commands
pub trait Executor {
    fn execute(&mut self, command: &HostCommand) -> Invocation;

    /// Whether root commands are prefixed with `sudo`
    fn elevate(&self) -> bool;

    /// True when nothing on the host may be changed, including in-process
    /// file writes done by the caller
    fn is_dry_run(&self) -> bool {
        false
    }

    fn execute_all(&mut self, commands: &[HostCommand]) -> Vec<Invocation> {
        commands.iter().map(|c| self.execute(c)).collect()
    }
}

/// Whether this process needs `sudo` for root commands
pub fn needs_elevation() -> bool {
    !nix::unistd::geteuid().is_root()
}

/// Executes commands on the host with inherited stdio
#[derive(Debug, Clone)]
pub struct SystemExecutor {
    elevate: bool,
}

impl SystemExecutor {
    pub fn new(elevate: bool) -> Self {
        Self { elevate }
    }

    /// Elevate unless already running as root
    pub fn detect() -> Self {
        Self::new(needs_elevation())
    }
}

impl Executor for SystemExecutor {
    fn execute(&mut self, command: &HostCommand) -> Invocation {
        let line = command.command_line(self.elevate);
        info!("execute: {} args={:?}", line.program, line.args);
        theme::message(format!("Running: {}", line));

        let mut cmd = Command::new(&line.program);
        cmd.args(&line.args).dies_with_parent();

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!("Failed to spawn {}: {}", line.program, e);
                theme::failure(format!("Could not start {}: {}", line.program, e));
                return Invocation {
                    command: line,
                    exit_code: None,
                    launched: false,
                    dry_run: false,
                };
            }
        };

        let _tracked = TrackedChild::new(child.id());
        let exit_code = match child.wait() {
            Ok(status) => status.code(),
            Err(e) => {
                error!("Failed waiting for {}: {}", line.program, e);
                None
            }
        };

        match exit_code {
            Some(0) => info!("{} exited with code 0", line.program),
            Some(code) => warn!("{} exited with code {}", line.program, code),
            None => warn!("{} terminated without an exit code", line.program),
        }

        Invocation {
            command: line,
            exit_code,
            launched: true,
            dry_run: false,
        }
    }

    fn elevate(&self) -> bool {
        self.elevate
    }
}

/// Records commands instead of running them
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    elevate: bool,
    dry_run: bool,
    commands: Vec<HostCommand>,
}

impl RecordingExecutor {
    /// Silent recorder; callers still perform their own file work
    pub fn new(elevate: bool) -> Self {
        Self {
            elevate,
            dry_run: false,
            commands: Vec::new(),
        }
    }

    /// Prints each command and marks the run as dry
    pub fn dry_run(elevate: bool) -> Self {
        Self {
            elevate,
            dry_run: true,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    /// Rendered command lines, in execution order
    pub fn rendered(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|c| c.command_line(self.elevate).render())
            .collect()
    }

    pub fn ran_installer(&self) -> bool {
        self.commands.iter().any(HostCommand::is_installer)
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, command: &HostCommand) -> Invocation {
        let line = command.command_line(self.elevate);
        if self.dry_run {
            theme::warning(format!("[DRY RUN] {}", line));
        }
        info!("record: {}", line);
        self.commands.push(command.clone());
        Invocation {
            command: line,
            exit_code: None,
            launched: false,
            dry_run: true,
        }
    }

    fn elevate(&self) -> bool {
        self.elevate
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
