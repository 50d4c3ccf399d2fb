//! Interactive front end for the Lapse link registry.
//!
//! Everything that is not lifecycle logic lives here: configuration,
//! logging setup, URL validation, command parsing and rendering of short
//! links as `<base><id>`.

pub mod cli;
pub mod command;
pub mod logging;
pub mod session;
pub mod target;

pub use cli::{LogFormat, CLI};
pub use command::{Command, CommandError};
pub use session::{Flow, Session};
pub use target::{is_valid_target, validate_target, TargetError};
