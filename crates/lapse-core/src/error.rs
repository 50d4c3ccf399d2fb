use thiserror::Error;

/// Result type for link creation.
pub type CreateResult<T> = std::result::Result<T, CreateError>;

/// Result type for link resolution.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Every candidate id collided with a live link. Worth alerting on.
    #[error("no free link id after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
}

/// Why a link could not be followed.
///
/// These are routine outcomes, not operational failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("link not found")]
    NotFound,
    /// The link outlived its ttl. It has been removed as a side effect.
    #[error("link expired")]
    Expired,
    #[error("link use limit reached")]
    LimitReached,
}
