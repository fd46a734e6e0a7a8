//! Type-safe arguments for `foreman-installer`.

use crate::command_traits::CommandArgs;
use crate::types::{ComputeResource, TuningProfile};

/// Where foreman-installer writes the Katello scenario log
pub const INSTALLER_LOG: &str = "/var/log/foreman-installer/katello.log";

/// `foreman-installer --scenario katello ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForemanInstallerArgs {
    pub tuning: TuningProfile,
    pub location: String,
    pub organization: String,
    pub admin_username: String,
    /// Compute resource plugin to enable, if any
    pub compute_resource: Option<ComputeResource>,
}

impl CommandArgs for ForemanInstallerArgs {
    fn program(&self) -> &'static str {
        "foreman-installer"
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "--scenario".to_string(),
            "katello".to_string(),
            "--tuning".to_string(),
            self.tuning.to_string(),
            "--foreman-initial-location".to_string(),
            self.location.clone(),
            "--foreman-initial-organization".to_string(),
            self.organization.clone(),
            "--foreman-initial-admin-username".to_string(),
            self.admin_username.clone(),
        ];
        if let Some(cr) = self.compute_resource {
            args.push(cr.installer_flag());
        }
        args
    }
}
