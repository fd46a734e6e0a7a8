//! Logic modules: turn the operator's request into checked decisions and
//! ordered host commands.
//!
//! # Modules
//!
//! - `mode` - connected/disconnected selection
//! - `params` - parameter resolution with prompting and defaults
//! - `preflight` - host checks in their fixed order
//! - `sequencer` - preparation stages, final confirmation and installer run

pub mod mode;
pub mod params;
pub mod preflight;
pub mod sequencer;
