//! Typed host commands
//!
//! Each submodule covers one external program. [`HostCommand`] is the closed
//! set of everything the installer and the mirror builder can execute, so a
//! stage is just a `Vec<HostCommand>` that can be run, recorded or rendered.

pub mod dnf;
pub mod files;
pub mod firewall;
pub mod foreman;
pub mod mirror;

use std::fmt;

use crate::command_traits::{CommandArgs, CommandLine};

pub use dnf::DnfArgs;
pub use files::{ChownRootArgs, ExtractArchiveArgs, MoveArgs, RestoreconArgs, RetireRepoFilesArgs};
pub use firewall::FirewallArgs;
pub use foreman::{ForemanInstallerArgs, INSTALLER_LOG};
pub use mirror::{CreaterepoArgs, FetchArgs, ReposyncArgs};

/// Any command this tool runs on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Dnf(DnfArgs),
    Firewall(FirewallArgs),
    ForemanInstaller(ForemanInstallerArgs),
    Reposync(ReposyncArgs),
    Createrepo(CreaterepoArgs),
    Fetch(FetchArgs),
    ExtractArchive(ExtractArchiveArgs),
    RetireRepoFiles(RetireRepoFilesArgs),
    Move(MoveArgs),
    Restorecon(RestoreconArgs),
    ChownRoot(ChownRootArgs),
}

impl HostCommand {
    fn inner(&self) -> &dyn CommandArgs {
        match self {
            Self::Dnf(a) => a,
            Self::Firewall(a) => a,
            Self::ForemanInstaller(a) => a,
            Self::Reposync(a) => a,
            Self::Createrepo(a) => a,
            Self::Fetch(a) => a,
            Self::ExtractArchive(a) => a,
            Self::RetireRepoFiles(a) => a,
            Self::Move(a) => a,
            Self::Restorecon(a) => a,
            Self::ChownRoot(a) => a,
        }
    }

    /// Argument vector as it would be executed
    pub fn command_line(&self, elevate: bool) -> CommandLine {
        CommandLine::build(self, elevate)
    }

    pub fn is_installer(&self) -> bool {
        matches!(self, Self::ForemanInstaller(_))
    }
}

impl CommandArgs for HostCommand {
    fn program(&self) -> &'static str {
        self.inner().program()
    }

    fn to_cli_args(&self) -> Vec<String> {
        self.inner().to_cli_args()
    }

    fn needs_root(&self) -> bool {
        self.inner().needs_root()
    }
}

/// Unelevated rendering, used in log lines and tests
impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.command_line(false).fmt(f)
    }
}

macro_rules! host_command_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for HostCommand {
                fn from(args: $ty) -> Self {
                    Self::$variant(args)
                }
            }
        )*
    };
}

host_command_from!(
    Dnf(DnfArgs),
    Firewall(FirewallArgs),
    ForemanInstaller(ForemanInstallerArgs),
    Reposync(ReposyncArgs),
    Createrepo(CreaterepoArgs),
    Fetch(FetchArgs),
    ExtractArchive(ExtractArchiveArgs),
    RetireRepoFiles(RetireRepoFilesArgs),
    Move(MoveArgs),
    Restorecon(RestoreconArgs),
    ChownRoot(ChownRootArgs),
);
