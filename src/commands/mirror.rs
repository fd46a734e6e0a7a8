//! Type-safe arguments for the repository synchronization tools.
//!
//! These run in the operator's working directory and write only there,
//! so none of them is elevated.

use std::path::PathBuf;

use crate::command_traits::CommandArgs;

/// `reposync --delete --download-metadata -p <dir> -n --repo <id>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReposyncArgs {
    pub repo_id: String,
    /// Parent directory; packages land in `<download_path>/<repo_id>`
    pub download_path: PathBuf,
}

impl CommandArgs for ReposyncArgs {
    fn program(&self) -> &'static str {
        "reposync"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "--delete".to_string(),
            "--download-metadata".to_string(),
            "-p".to_string(),
            self.download_path.display().to_string(),
            // newest packages only
            "-n".to_string(),
            "--repo".to_string(),
            self.repo_id.clone(),
        ]
    }

    fn needs_root(&self) -> bool {
        false
    }
}

/// `createrepo <dir>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreaterepoArgs {
    pub directory: PathBuf,
}

impl CommandArgs for CreaterepoArgs {
    fn program(&self) -> &'static str {
        "createrepo"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![self.directory.display().to_string()]
    }

    fn needs_root(&self) -> bool {
        false
    }
}

/// `wget -P <dir> <url>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchArgs {
    pub url: String,
    pub destination: PathBuf,
}

impl CommandArgs for FetchArgs {
    fn program(&self) -> &'static str {
        "wget"
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "-P".to_string(),
            self.destination.display().to_string(),
            self.url.clone(),
        ]
    }

    fn needs_root(&self) -> bool {
        false
    }
}
