//! Parameter resolution
//!
//! Turns a [`RunConfiguration`] (what the operator supplied) into a
//! [`ResolvedConfiguration`] (everything the sequences need, validated).
//! Resolution asks for missing values when prompting is allowed and fails
//! with `MissingParameter` when it is not. It runs to completion before
//! the first host command, so a run never stops halfway for input.
//!
//! # Rules
//!
//! | Value | Missing, `--noprompt` | Missing, interactive |
//! |-------|-----------------------|----------------------|
//! | Foreman/Katello version | error | ask until a non-negative number |
//! | organization, location, admin username | error | ask once, blank takes the placeholder |
//! | compute resource | disabled | disabled |

use log::{info, warn};

use crate::config_file::RunConfiguration;
use crate::error::{Result, SetupError};
use crate::prompt::Prompter;
use crate::theme;
use crate::types::{ComputeResource, Mode, TuningProfile};

/// Where supported version pairs are listed
pub const DOCS_URL: &str = "https://docs.theforeman.org";

pub const DEFAULT_ORGANIZATION: &str = "Default_Organization";
pub const DEFAULT_LOCATION: &str = "Default_Location";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// What the calling workflow needs resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub noprompt: bool,
    /// Foreman and Katello versions must be present
    pub require_versions: bool,
    /// Organization, location and admin username must be present
    pub require_identity: bool,
}

impl ResolveOptions {
    /// Installer: versions only matter when packages come from the internet
    pub fn for_install(mode: Mode, noprompt: bool) -> Self {
        Self {
            noprompt,
            require_versions: mode.is_connected(),
            require_identity: true,
        }
    }

    /// Mirror builder: both sides name the repositories by version
    pub fn for_mirror(noprompt: bool) -> Self {
        Self {
            noprompt,
            require_versions: true,
            require_identity: false,
        }
    }
}

/// Foreman and Katello release versions, kept as entered (`3.10` stays `3.10`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versions {
    pub foreman: String,
    pub katello: String,
}

/// Fully resolved run parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    pub organization: String,
    pub location: String,
    pub admin_username: String,
    pub tuning: TuningProfile,
    /// Present whenever the workflow required them
    pub versions: Option<Versions>,
    pub compute_resource: Option<ComputeResource>,
    pub mode: Mode,
    pub noprompt: bool,
}

impl ResolvedConfiguration {
    /// Versions for a workflow that required them
    pub fn require_versions(&self) -> Result<&Versions> {
        self.versions.as_ref().ok_or(SetupError::MissingParameter {
            field: "Foreman version",
        })
    }
}

/// True when `input` parses as a finite, non-negative number.
pub fn is_valid_version(input: &str) -> bool {
    input
        .trim()
        .parse::<f64>()
        .is_ok_and(|v| v.is_finite() && v >= 0.0)
}

/// Resolve `config` into a new value. `config` is not modified.
pub fn resolve(
    config: &RunConfiguration,
    opts: &ResolveOptions,
    prompter: &mut dyn Prompter,
) -> Result<ResolvedConfiguration> {
    let noprompt = opts.noprompt || config.noprompt;

    let versions = if opts.require_versions {
        let foreman = resolve_version(
            "Foreman",
            "Foreman version",
            config.foreman_version.as_deref(),
            noprompt,
            prompter,
        )?;
        let katello = resolve_version(
            "Katello",
            "Katello version",
            config.katello_version.as_deref(),
            noprompt,
            prompter,
        )?;
        Some(Versions { foreman, katello })
    } else {
        None
    };

    let (organization, location, admin_username) = if opts.require_identity {
        let org = resolve_text(
            "organization",
            "Organization: ",
            &config.organization,
            DEFAULT_ORGANIZATION,
            noprompt,
            prompter,
        )?;
        let loc = resolve_text(
            "location",
            "Location: ",
            &config.location,
            DEFAULT_LOCATION,
            noprompt,
            prompter,
        )?;
        let user = resolve_text(
            "admin username",
            "Admin username: ",
            &config.admin_username,
            DEFAULT_ADMIN_USERNAME,
            noprompt,
            prompter,
        )?;
        (org, loc, user)
    } else {
        (
            config.organization.clone(),
            config.location.clone(),
            config.admin_username.clone(),
        )
    };

    let compute_resource = resolve_compute_resource(config.compute_resource.as_deref());

    let resolved = ResolvedConfiguration {
        organization,
        location,
        admin_username,
        tuning: config.tuning,
        versions,
        compute_resource,
        mode: config.mode,
        noprompt,
    };
    info!("Resolved configuration: {:?}", resolved);
    Ok(resolved)
}

// ============================================================================
// Individual values
// ============================================================================

fn resolve_version(
    product: &str,
    field: &'static str,
    given: Option<&str>,
    noprompt: bool,
    prompter: &mut dyn Prompter,
) -> Result<String> {
    if let Some(value) = given.map(str::trim).filter(|v| !v.is_empty()) {
        if is_valid_version(value) {
            return Ok(value.to_string());
        }
        return Err(SetupError::invalid(field, value));
    }

    if noprompt {
        theme::failure_strong(format!("Unable to get {} interactively!", field));
        theme::failure(format!("Define the {} argument, or allow prompting", field));
        theme::blank();
        return Err(SetupError::MissingParameter { field });
    }

    theme::prompt_line(format!("What version of {} are you targeting?", product));
    theme::blank();
    theme::message("For a list of supported versions, see:");
    theme::plain(DOCS_URL);
    theme::blank();

    let label = format!("{}: ", product);
    loop {
        let answer = prompter.read_line(&label)?;
        let answer = answer.trim();
        if is_valid_version(answer) {
            return Ok(answer.to_string());
        }
        theme::failure("Invalid input!");
    }
}

fn resolve_text(
    field: &'static str,
    label: &str,
    given: &str,
    placeholder: &str,
    noprompt: bool,
    prompter: &mut dyn Prompter,
) -> Result<String> {
    let given = given.trim();
    if !given.is_empty() {
        return Ok(given.to_string());
    }
    if noprompt {
        return Err(SetupError::MissingParameter { field });
    }

    let answer = prompter.read_line(label)?;
    let answer = answer.trim();
    if answer.is_empty() {
        info!("No {} entered, using {}", field, placeholder);
        Ok(placeholder.to_string())
    } else {
        Ok(answer.to_string())
    }
}

/// Unknown names disable the capability rather than stopping the run.
fn resolve_compute_resource(given: Option<&str>) -> Option<ComputeResource> {
    let name = given.map(str::trim).filter(|n| !n.is_empty())?;
    match name.to_lowercase().parse::<ComputeResource>() {
        Ok(cr) => Some(cr),
        Err(_) => {
            warn!("Unknown compute resource {:?}, continuing without one", name);
            theme::warning_strong("Compute resource invalid!");
            theme::message("Use -h or --help for valid options");
            theme::warning("Continuing without a compute resource");
            theme::blank();
            None
        }
    }
}
