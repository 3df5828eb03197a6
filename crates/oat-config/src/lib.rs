//! Configuration and gating for OpenAdapt telemetry.
//!
//! Settings are resolved from three layers, highest priority first:
//!
//! 1. Environment variables (`DO_NOT_TRACK`, `OPENADAPT_TELEMETRY_*`)
//! 2. Per-user configuration file (`<config_dir>/openadapt/telemetry.json`)
//! 3. Compiled-in defaults
//!
//! The universal `DO_NOT_TRACK` opt-out always wins: no package flag or
//! file setting can re-enable telemetry once it is set. Configuration
//! problems never crash the host process; a malformed file or an
//! out-of-range value is logged and replaced by defaults.
//!
//! This crate also hosts the internal-usage classifier, which tags
//! events originating from the maintaining team's own machines and CI.

pub mod detect;
pub mod env;
pub mod error;
pub mod gate;
pub mod settings;

pub use detect::{is_ci_environment, is_internal_user, InternalSignals};
pub use env::parse_bool;
pub use error::{ConfigError, Result};
pub use gate::enabled_from_env;
pub use settings::TelemetrySettings;
