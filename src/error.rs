//! Error handling module for foreman-setup
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Fatal pre-flight outcomes, configuration problems and operator aborts all
//! surface as a `SetupError` and terminate the run from `main`.

use thiserror::Error;

use crate::types::CheckKind;

/// Main error type for foreman-setup
#[derive(Error, Debug)]
pub enum SetupError {
    /// Kernel release does not carry the expected distribution tag
    #[error("EL8 platform not detected (kernel release: {release})")]
    UnsupportedPlatform { release: String },

    /// Host is below the development tuning profile floor
    #[error(
        "Host does not meet the minimum resources for the {profile} tuning profile \
         ({required_cores} core, {required_memory_gb} GB memory; found {cores} core, {memory_gb} GB)"
    )]
    InsufficientResources {
        profile: String,
        required_cores: usize,
        required_memory_gb: u64,
        cores: usize,
        memory_gb: u64,
    },

    /// Both connected and disconnected modes were requested
    #[error("You cannot select both connected and disconnected system types")]
    AmbiguousMode,

    /// Neither connected nor disconnected mode was requested
    #[error("System type not defined: you must define connected or disconnected")]
    ModeNotSelected,

    /// A value the installer needs is absent and prompting is disabled
    #[error("Unable to get {field} interactively: define it on the command line, or allow prompting")]
    MissingParameter { field: &'static str },

    /// A supplied value could not be parsed
    #[error("Invalid {field}: {value}")]
    InvalidParameter { field: &'static str, value: String },

    /// Operator declined to continue past a failed check
    #[error("Aborted at {check} check")]
    Aborted { check: CheckKind },

    /// Reading operator input failed
    #[error("Input error: {0}")]
    Input(String),

    /// IO errors (terminal, files, archive)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for foreman-setup operations
pub type Result<T> = std::result::Result<T, SetupError>;

impl SetupError {
    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }

    /// Create an invalid parameter error
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            value: value.into(),
        }
    }

    /// Short remediation hint printed under the error banner, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameter { .. }
            | Self::InvalidParameter { .. }
            | Self::AmbiguousMode
            | Self::ModeNotSelected => Some("Use -h or --help for assistance"),
            Self::InsufficientResources { .. } => {
                Some("Add CPU cores or memory, or pick a smaller tuning profile with --tune")
            }
            _ => None,
        }
    }
}

impl From<anyhow::Error> for SetupError {
    fn from(err: anyhow::Error) -> Self {
        Self::General(format!("{:#}", err))
    }
}
