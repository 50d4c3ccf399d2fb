//! Link id generators.
//!
//! Generators only propose candidates. They never look at storage; the
//! registry checks each candidate against the live links and asks again on
//! a collision.

pub mod error;
pub mod random;
pub mod seq;

pub use error::Error;
pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use lapse_core::LinkId;

/// Trait for generating candidate link ids.
///
/// Implementations can vary from random fixed-width generators to
/// sequential counters.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<LinkId>;

    /// Produces the next candidate. It may collide with a live link.
    fn generate(&self) -> Self::Output;
}

impl<G: Generator> Generator for std::sync::Arc<G> {
    type Output = G::Output;

    fn generate(&self) -> Self::Output {
        (**self).generate()
    }
}
