use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// foreman-setup - guided Foreman/Katello installation for EL8 hosts
#[derive(Parser, Debug)]
#[command(name = "foreman-setup")]
#[command(about = "Install Foreman with Katello on EL8, or build an offline repository mirror")]
#[command(version)]
pub struct Cli {
    /// Do not prompt; continue past non-critical failures and fail on
    /// anything that would need an answer.
    #[arg(short = 'a', long, global = true)]
    pub noprompt: bool,

    /// Dry-run mode: print the commands and file changes that would be
    /// made without making them. Host checks still run.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the host, prepare it and run foreman-installer
    Install(InstallArgs),
    /// Build (online) or install (offline) a repository mirror
    Mirror(MirrorArgs),
    /// Run the host checks only
    Preflight {
        /// Tuning profile to check against
        #[arg(short, long, default_value = "default")]
        tune: String,
    },
    /// Validate a saved run configuration
    Validate {
        /// Path to configuration file to validate
        config: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Install from a local mirror instead of the internet
    #[arg(short, long)]
    pub disconnected: bool,

    /// Foreman version, e.g. 3.5
    #[arg(short, long)]
    pub foreman: Option<String>,

    /// Katello version, e.g. 4.7
    #[arg(short, long)]
    pub katello: Option<String>,

    /// Initial location
    #[arg(short, long)]
    pub loc: Option<String>,

    /// Initial organization
    #[arg(short, long)]
    pub org: Option<String>,

    /// Initial admin username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Tuning profile: development, default, medium, large, extra-large,
    /// extra-extra-large
    #[arg(short, long)]
    pub tune: Option<String>,

    /// Compute resource: vmware, ec2, libvirt, gce, openstack, ovirt
    #[arg(short = 'c', long)]
    pub compute_resource: Option<String>,

    /// Load settings from a JSON run configuration; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the effective run configuration to this file before starting
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct MirrorArgs {
    /// Sync and pack repositories on an internet-connected host
    #[arg(short = 'c', long)]
    pub online: bool,

    /// Unpack and register repositories on the disconnected host
    #[arg(short = 'd', long)]
    pub offline: bool,

    /// Foreman version, e.g. 3.5
    #[arg(short, long)]
    pub foreman: Option<String>,

    /// Katello version, e.g. 4.7
    #[arg(short, long)]
    pub katello: Option<String>,

    /// Directory repositories are synced into
    #[arg(long, default_value = "foreman-repos")]
    pub workdir: PathBuf,

    /// Archive to write (online) or read (offline)
    #[arg(long, default_value = "foreman-repos.tar")]
    pub archive: PathBuf,

    /// Where the archive is unpacked on the offline host
    #[arg(long, default_value = "/var/lib")]
    pub dest: PathBuf,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["foreman-setup"]).is_err());
    }

    #[test]
    fn test_cli_install_flags() {
        let cli = Cli::try_parse_from([
            "foreman-setup",
            "install",
            "-a",
            "-f",
            "3.5",
            "-k",
            "4.7",
            "-o",
            "ACME",
            "-l",
            "Lab",
            "-u",
            "operator",
            "-t",
            "medium",
            "-c",
            "libvirt",
        ])
        .unwrap();
        assert!(cli.noprompt);
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.foreman.as_deref(), Some("3.5"));
                assert_eq!(args.org.as_deref(), Some("ACME"));
                assert_eq!(args.loc.as_deref(), Some("Lab"));
                assert_eq!(args.username.as_deref(), Some("operator"));
                assert_eq!(args.tune.as_deref(), Some("medium"));
                assert_eq!(args.compute_resource.as_deref(), Some("libvirt"));
                assert!(!args.disconnected);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_install_with_config() {
        let cli = Cli::try_parse_from([
            "foreman-setup",
            "install",
            "--config",
            "/path/to/run.json",
            "--dry-run",
        ])
        .unwrap();
        assert!(cli.dry_run);
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.config.unwrap().to_str().unwrap(), "/path/to/run.json");
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_mirror_defaults() {
        let cli = Cli::try_parse_from(["foreman-setup", "mirror", "-d"]).unwrap();
        match cli.command {
            Commands::Mirror(args) => {
                assert!(args.offline);
                assert!(!args.online);
                assert_eq!(args.workdir, PathBuf::from("foreman-repos"));
                assert_eq!(args.archive, PathBuf::from("foreman-repos.tar"));
                assert_eq!(args.dest, PathBuf::from("/var/lib"));
            }
            _ => panic!("Expected Mirror command"),
        }
    }

    #[test]
    fn test_cli_mirror_accepts_both_flags() {
        // Exclusivity is reported by the mode selector with its own error
        let cli = Cli::try_parse_from(["foreman-setup", "mirror", "-c", "-d"]).unwrap();
        match cli.command {
            Commands::Mirror(args) => assert!(args.online && args.offline),
            _ => panic!("Expected Mirror command"),
        }
    }

    #[test]
    fn test_cli_validate_command() {
        let cli = Cli::try_parse_from(["foreman-setup", "validate", "/path/to/run.json"]).unwrap();
        match cli.command {
            Commands::Validate { config } => {
                assert_eq!(config.to_str().unwrap(), "/path/to/run.json");
            }
            _ => panic!("Expected Validate command"),
        }
    }
}
