//! Type-safe arguments for privileged file operations on system paths.

use std::path::PathBuf;

use crate::command_traits::CommandArgs;

fn paths_to_args(paths: &[PathBuf]) -> impl Iterator<Item = String> + '_ {
    paths.iter().map(|p| p.display().to_string())
}

/// `tar --skip-old-files -xf <archive> -C <dest>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractArchiveArgs {
    pub archive: PathBuf,
    pub destination: PathBuf,
}

impl CommandArgs for ExtractArchiveArgs {
    fn program(&self) -> &'static str {
        "tar"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "--skip-old-files".to_string(),
            "-xf".to_string(),
            self.archive.display().to_string(),
            "-C".to_string(),
            self.destination.display().to_string(),
        ]
    }
}

/// Renames every `*.repo` file in a directory to `*.repo.old`:
/// `find <dir> -type f -name *.repo -exec mv {} {}.old ;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetireRepoFilesArgs {
    pub directory: PathBuf,
}

impl CommandArgs for RetireRepoFilesArgs {
    fn program(&self) -> &'static str {
        "find"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![self.directory.display().to_string()];
        args.extend(
            ["-type", "f", "-name", "*.repo", "-exec", "mv", "{}", "{}.old", ";"]
                .iter()
                .map(|s| s.to_string()),
        );
        args
    }
}

/// `mv -f <sources...> <dest>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveArgs {
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
}

impl CommandArgs for MoveArgs {
    fn program(&self) -> &'static str {
        "mv"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec!["-f".to_string()];
        args.extend(paths_to_args(&self.sources));
        args.push(self.destination.display().to_string());
        args
    }
}

/// `restorecon <paths...>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreconArgs {
    pub paths: Vec<PathBuf>,
}

impl CommandArgs for RestoreconArgs {
    fn program(&self) -> &'static str {
        "restorecon"
    }

    fn to_cli_args(&self) -> Vec<String> {
        paths_to_args(&self.paths).collect()
    }
}

/// `chown root: <paths...>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChownRootArgs {
    pub paths: Vec<PathBuf>,
}

impl CommandArgs for ChownRootArgs {
    fn program(&self) -> &'static str {
        "chown"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec!["root:".to_string()];
        args.extend(paths_to_args(&self.paths));
        args
    }
}
