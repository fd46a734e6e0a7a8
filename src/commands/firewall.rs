//! Type-safe arguments for `firewall-cmd`.

use crate::command_traits::CommandArgs;

/// One `firewall-cmd` operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirewallArgs {
    /// `firewall-cmd --add-service <service>` (runtime only)
    AddService(String),
    /// `firewall-cmd --runtime-to-permanent`
    RuntimeToPermanent,
}

impl FirewallArgs {
    pub fn add_service(service: impl Into<String>) -> Self {
        Self::AddService(service.into())
    }
}

impl CommandArgs for FirewallArgs {
    fn program(&self) -> &'static str {
        "firewall-cmd"
    }

    fn to_cli_args(&self) -> Vec<String> {
        match self {
            Self::AddService(service) => vec!["--add-service".to_string(), service.clone()],
            Self::RuntimeToPermanent => vec!["--runtime-to-permanent".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firewall_args() {
        assert_eq!(
            FirewallArgs::add_service("foreman-proxy").to_cli_args(),
            vec!["--add-service", "foreman-proxy"]
        );
        assert_eq!(
            FirewallArgs::RuntimeToPermanent.to_cli_args(),
            vec!["--runtime-to-permanent"]
        );
    }
}
