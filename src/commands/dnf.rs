//! Type-safe arguments for `dnf`.

use crate::command_traits::CommandArgs;

/// One `dnf` operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnfArgs {
    /// `dnf install -y <package-or-url>`
    Install(String),
    /// `dnf update -y`
    Update,
    /// `dnf repolist --enablerepo <repo>`
    EnableRepo(String),
    /// `dnf module enable -y <stream>`
    ModuleEnable(String),
    /// `dnf module switch-to -y <stream>`
    ModuleSwitch(String),
    /// `dnf repolist`
    RepoList,
}

impl DnfArgs {
    pub fn install(package: impl Into<String>) -> Self {
        Self::Install(package.into())
    }

    pub fn enable_repo(repo: impl Into<String>) -> Self {
        Self::EnableRepo(repo.into())
    }

    pub fn module_enable(stream: impl Into<String>) -> Self {
        Self::ModuleEnable(stream.into())
    }

    pub fn module_switch(stream: impl Into<String>) -> Self {
        Self::ModuleSwitch(stream.into())
    }
}

impl CommandArgs for DnfArgs {
    fn program(&self) -> &'static str {
        "dnf"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let args: Vec<&str> = match self {
            Self::Install(pkg) => vec!["install", "-y", pkg.as_str()],
            Self::Update => vec!["update", "-y"],
            Self::EnableRepo(repo) => vec!["repolist", "--enablerepo", repo.as_str()],
            Self::ModuleEnable(stream) => vec!["module", "enable", "-y", stream.as_str()],
            Self::ModuleSwitch(stream) => vec!["module", "switch-to", "-y", stream.as_str()],
            Self::RepoList => vec!["repolist"],
        };
        args.into_iter().map(String::from).collect()
    }

    /// Listing repositories is read-only.
    fn needs_root(&self) -> bool {
        !matches!(self, Self::RepoList)
    }
}
