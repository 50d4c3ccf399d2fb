//! In-memory registry of expiring, use-limited links.
//!
//! [`LinkRegistry`] owns the links and enforces their lifecycle: it hands
//! out collision-checked ids, counts uses atomically, evicts links that
//! outlived their ttl and gates deletion on the owner. [`Janitor`] runs
//! [`LinkRegistry::sweep`] on a timer.
//!
//! # Example
//!
//! ```rust
//! use lapse_core::{LinkSpec, ResolveError};
//! use lapse_registry::LinkRegistry;
//! use std::time::Duration;
//!
//! let registry = LinkRegistry::new();
//! let link = registry
//!     .create(LinkSpec::new("https://example.com", "user-1", Duration::from_secs(60), 1))
//!     .unwrap();
//!
//! assert_eq!(registry.resolve(link.id.as_str()).unwrap(), "https://example.com");
//! assert_eq!(registry.resolve(link.id.as_str()), Err(ResolveError::LimitReached));
//! ```

pub mod janitor;
pub mod registry;

pub use janitor::Janitor;
pub use registry::{LinkRegistry, RegistrySettings};
