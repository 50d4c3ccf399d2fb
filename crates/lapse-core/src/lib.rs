//! Core types for the Lapse link registry.
//!
//! This crate holds the link record, the lifecycle policy and the error
//! taxonomy shared by the generator, the registry and the command-line
//! front end. It performs no I/O and holds no storage.

pub mod clock;
pub mod error;
pub mod link;
pub mod policy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CreateError, ResolveError};
pub use link::{LinkId, LinkRecord, LinkSpec};
pub use policy::LifecyclePolicy;
