//! Mode selection
//!
//! The mirror builder has no default: the operator must say whether this
//! host is the online side (download and pack) or the offline side (unpack
//! and register). The installer defaults to a connected install.

use log::info;

use crate::error::{Result, SetupError};
use crate::types::Mode;

/// Select the mirror mode from the two mutually exclusive flags.
///
/// Runs before any command so a bad combination changes nothing on the host.
pub fn select_mode(connected: bool, disconnected: bool) -> Result<Mode> {
    let mode = match (connected, disconnected) {
        (true, true) => return Err(SetupError::AmbiguousMode),
        (false, false) => return Err(SetupError::ModeNotSelected),
        (true, false) => Mode::Connected,
        (false, true) => Mode::Disconnected,
    };
    info!("Selected {} mode", mode);
    Ok(mode)
}
