//! Repository definition files for the offline host
//!
//! Each synchronized repository gets a `[section]` in one of five `.repo`
//! files pointing at its directory inside the unpacked mirror. GPG keys
//! are the ones collected into the mirror on the online side.

use std::fmt::Write as _;
use std::path::Path;

use crate::logic::params::Versions;

/// Repositories synchronized on the online host, in sync order
pub const MIRRORED_REPOS: &[&str] = &[
    "appstream",
    "baseos",
    "foreman-plugins",
    "foreman",
    "katello",
    "katello-candlepin",
    "pulpcore",
    "puppet7",
];

const ALMA_KEY: &str = "RPM-GPG-KEY-AlmaLinux";
const FOREMAN_KEY: &str = "RPM-GPG-KEY-foreman";
pub const PULPCORE_KEY: &str = "GPG-RPM-KEY-pulpcore";
const PUPPET_KEYS: &[&str] = &[
    "RPM-GPG-KEY-puppet7-release",
    "RPM-GPG-KEY-2025-04-06-puppet7-release",
];

/// One `[id]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDefinition {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub gpg_keys: Vec<String>,
    pub enabled: bool,
    pub gpgcheck: bool,
}

/// One file under `/etc/yum.repos.d`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    pub file_name: &'static str,
    pub repos: Vec<RepoDefinition>,
}

impl RepoDefinition {
    fn local(mirror_root: &Path, id: &str, name: String, keys: &[&str], gpgcheck: bool) -> Self {
        let file_url = |leaf: &str| format!("file://{}", mirror_root.join(leaf).display());
        Self {
            id: id.to_string(),
            name,
            base_url: file_url(id),
            gpg_keys: keys.iter().map(|k| file_url(*k)).collect(),
            enabled: true,
            gpgcheck,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[{}]", self.id);
        let _ = writeln!(out, "name={}", self.name);
        let _ = writeln!(out, "baseurl={}", self.base_url);
        if !self.gpg_keys.is_empty() {
            let _ = writeln!(out, "gpgkey={}", self.gpg_keys.join(" "));
        }
        let _ = writeln!(out, "enabled={}", u8::from(self.enabled));
        let _ = writeln!(out, "gpgcheck={}", u8::from(self.gpgcheck));
        out
    }
}

impl RepoFile {
    pub fn render(&self) -> String {
        self.repos
            .iter()
            .map(RepoDefinition::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Definitions for a mirror unpacked at `mirror_root`
/// (e.g. `/var/lib/foreman-repos`).
pub fn repo_files(mirror_root: &Path, versions: &Versions) -> Vec<RepoFile> {
    let def = |id: &str, name: String, keys: &[&str], gpgcheck: bool| {
        RepoDefinition::local(mirror_root, id, name, keys, gpgcheck)
    };

    vec![
        RepoFile {
            file_name: "alma.repo",
            repos: vec![
                def("baseos", "AlmaLinux 8 - BaseOS".into(), &[ALMA_KEY], true),
                def("appstream", "AlmaLinux 8 - AppStream".into(), &[ALMA_KEY], true),
            ],
        },
        RepoFile {
            file_name: "foreman.repo",
            repos: vec![def(
                "foreman",
                format!("Foreman {}", versions.foreman),
                &[FOREMAN_KEY],
                true,
            )],
        },
        RepoFile {
            file_name: "foreman-plugins.repo",
            repos: vec![def(
                "foreman-plugins",
                format!("Foreman plugins {}", versions.foreman),
                &[FOREMAN_KEY],
                false,
            )],
        },
        RepoFile {
            file_name: "katello.repo",
            repos: vec![
                def(
                    "katello",
                    format!("Katello {}", versions.katello),
                    &[FOREMAN_KEY],
                    true,
                ),
                def(
                    "katello-candlepin",
                    "Candlepin: an open source entitlement management system".into(),
                    &[FOREMAN_KEY],
                    true,
                ),
                def(
                    "pulpcore",
                    "pulpcore: Fetch, Upload, Organize, and Dist SW Packs".into(),
                    &[PULPCORE_KEY],
                    true,
                ),
            ],
        },
        RepoFile {
            file_name: "puppet.repo",
            repos: vec![def(
                "puppet7",
                "Puppet 7 Repository el 8 x86_64".into(),
                PUPPET_KEYS,
                true,
            )],
        },
    ]
}

/// First `GPG-RPM-KEY-pulpcore` location in an installed `katello.repo`.
pub fn pulpcore_key_url(katello_repo: &str) -> Option<String> {
    katello_repo
        .lines()
        .filter(|line| line.contains(PULPCORE_KEY))
        .find_map(|line| line.split_once('=').map(|(_, v)| v.trim().to_string()))
        .filter(|url| !url.is_empty())
}
