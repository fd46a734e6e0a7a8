//! Type-safe configuration types for foreman-setup
//!
//! Tuning profiles, compute resources and run modes are proper Rust enums
//! so that the installer flags built from them are checked at compile time.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// foreman-installer tuning profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TuningProfile {
    Development,
    #[default]
    Default,
    Medium,
    Large,
    ExtraLarge,
    ExtraExtraLarge,
}

impl TuningProfile {
    /// Minimum logical CPU cores for this profile
    pub fn min_cores(self) -> usize {
        match self {
            Self::Development => 1,
            Self::Default => 4,
            Self::Medium => 8,
            Self::Large => 16,
            Self::ExtraLarge => 32,
            Self::ExtraExtraLarge => 48,
        }
    }

    /// Minimum memory in whole GB for this profile
    pub fn min_memory_gb(self) -> u64 {
        match self {
            Self::Development => 6,
            Self::Default => 20,
            Self::Medium => 32,
            Self::Large => 64,
            Self::ExtraLarge => 128,
            Self::ExtraExtraLarge => 256,
        }
    }

    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Compute resource plugin enabled on the Foreman server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComputeResource {
    Vmware,
    Ec2,
    Libvirt,
    Gce,
    Openstack,
    Ovirt,
}

impl ComputeResource {
    /// The foreman-installer flag that enables this compute resource
    pub fn installer_flag(self) -> String {
        format!("--enable-foreman-compute-{}", self)
    }
}

/// Where packages come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Packages are fetched from the internet
    #[default]
    Connected,
    /// Packages come from a pre-staged local mirror
    Disconnected,
}

impl Mode {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Identifies a guarded check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumIter)]
pub enum CheckKind {
    #[strum(serialize = "platform")]
    Platform,
    #[strum(serialize = "resource")]
    Resources,
    #[strum(serialize = "terminal multiplexer")]
    Multiplexer,
    #[strum(serialize = "forward DNS")]
    ForwardDns,
    #[strum(serialize = "reverse DNS")]
    ReverseDns,
    #[strum(serialize = "final confirmation")]
    FinalConfirmation,
}
