//! Run configuration: what the operator asked for, before resolution.
//!
//! A `RunConfiguration` can be saved to and loaded from JSON so a run can be
//! repeated unattended. Values given on the command line override values
//! from the file, which override the built-in defaults. Blank text fields
//! and absent versions mean "not given" and are settled by the parameter
//! resolver.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::SetupError;
use crate::logic::params::is_valid_version;
use crate::types::{ComputeResource, Mode, TuningProfile};

/// Everything a run can be configured with
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    pub organization: String,
    pub location: String,
    pub admin_username: String,
    pub tuning: TuningProfile,
    pub foreman_version: Option<String>,
    pub katello_version: Option<String>,
    /// Kept as text so an unknown name can be reported and skipped
    pub compute_resource: Option<String>,
    pub mode: Mode,
    pub noprompt: bool,
}

/// Command-line values layered over a loaded configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub organization: Option<String>,
    pub location: Option<String>,
    pub admin_username: Option<String>,
    pub tuning: Option<String>,
    pub foreman_version: Option<String>,
    pub katello_version: Option<String>,
    pub compute_resource: Option<String>,
    pub disconnected: bool,
    pub noprompt: bool,
}

impl RunConfiguration {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate what is present. Absent values are not errors here; the
    /// resolver prompts for them or reports them.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("foreman_version", &self.foreman_version),
            ("katello_version", &self.katello_version),
        ] {
            if let Some(v) = value {
                if !is_valid_version(v) {
                    anyhow::bail!("{} must be a non-negative number, got {:?}", field, v);
                }
            }
        }

        for (field, value) in [
            ("organization", &self.organization),
            ("location", &self.location),
            ("admin_username", &self.admin_username),
        ] {
            if value.chars().any(char::is_control) {
                anyhow::bail!("{} cannot contain control characters", field);
            }
        }

        if self.admin_username.contains(char::is_whitespace) {
            anyhow::bail!("admin_username cannot contain whitespace");
        }

        if let Some(cr) = &self.compute_resource {
            if cr.trim().to_lowercase().parse::<ComputeResource>().is_err() {
                log::warn!(
                    "Unknown compute resource {:?} will be skipped (known: vmware, ec2, libvirt, gce, openstack, ovirt)",
                    cr
                );
            }
        }

        if self.mode == Mode::Disconnected
            && (self.foreman_version.is_some() || self.katello_version.is_some())
        {
            log::info!("Versions are ignored for a disconnected install");
        }

        Ok(())
    }

    /// Layer command-line values over this configuration
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> crate::error::Result<Self> {
        if let Some(org) = &overrides.organization {
            self.organization = org.clone();
        }
        if let Some(loc) = &overrides.location {
            self.location = loc.clone();
        }
        if let Some(user) = &overrides.admin_username {
            self.admin_username = user.clone();
        }
        if let Some(tune) = &overrides.tuning {
            self.tuning = tune
                .trim()
                .parse()
                .map_err(|_| SetupError::invalid("tuning profile", tune.as_str()))?;
        }
        if overrides.foreman_version.is_some() {
            self.foreman_version = overrides.foreman_version.clone();
        }
        if overrides.katello_version.is_some() {
            self.katello_version = overrides.katello_version.clone();
        }
        if overrides.compute_resource.is_some() {
            self.compute_resource = overrides.compute_resource.clone();
        }
        if overrides.disconnected {
            self.mode = Mode::Disconnected;
        }
        self.noprompt |= overrides.noprompt;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("run.json");

        let config = RunConfiguration {
            organization: "ACME".into(),
            location: "Lab".into(),
            admin_username: "admin".into(),
            tuning: TuningProfile::Medium,
            foreman_version: Some("3.5".into()),
            katello_version: Some("4.7".into()),
            compute_resource: Some("libvirt".into()),
            mode: Mode::Connected,
            noprompt: true,
        };

        config.save_to_file(&config_path).unwrap();
        let loaded = RunConfiguration::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("run.json");
        fs::write(&config_path, r#"{ "organization": "ACME", "tuning": "large" }"#).unwrap();

        let loaded = RunConfiguration::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.organization, "ACME");
        assert_eq!(loaded.tuning, TuningProfile::Large);
        assert_eq!(loaded.location, "");
        assert_eq!(loaded.foreman_version, None);
        assert_eq!(loaded.mode, Mode::Connected);
        assert!(!loaded.noprompt);
    }

    #[test]
    fn test_unknown_tuning_in_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("run.json");
        fs::write(&config_path, r#"{ "tuning": "huge" }"#).unwrap();
        let err = RunConfiguration::load_from_file(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse"));
    }

    #[test]
    fn test_validate() {
        let mut config = RunConfiguration::default();
        assert!(config.validate().is_ok());

        config.foreman_version = Some("three".into());
        assert!(config.validate().is_err());
        config.foreman_version = Some("3.10".into());
        assert!(config.validate().is_ok());

        config.compute_resource = Some("azure".into());
        assert!(config.validate().is_ok());
        config.compute_resource = Some("VMware".into());
        assert!(config.validate().is_ok());

        config.admin_username = "bad user".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = RunConfiguration {
            organization: "FromFile".into(),
            location: "FileLoc".into(),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            organization: Some("FromCli".into()),
            tuning: Some("extra-large".into()),
            disconnected: true,
            ..Default::default()
        };
        let merged = file.with_overrides(&overrides).unwrap();
        assert_eq!(merged.organization, "FromCli");
        assert_eq!(merged.location, "FileLoc");
        assert_eq!(merged.tuning, TuningProfile::ExtraLarge);
        assert_eq!(merged.mode, Mode::Disconnected);
    }

    #[test]
    fn test_unknown_tuning_override_is_invalid_parameter() {
        let overrides = ConfigOverrides {
            tuning: Some("huge".into()),
            ..Default::default()
        };
        let err = RunConfiguration::default().with_overrides(&overrides).unwrap_err();
        assert!(matches!(
            err,
            SetupError::InvalidParameter { field: "tuning profile", .. }
        ));
    }
}
