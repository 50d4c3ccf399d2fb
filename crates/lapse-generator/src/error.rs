use thiserror::Error;

/// Errors returned when configuring a generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid id width {width}; expected {min}..={max}")]
    InvalidWidth {
        width: usize,
        min: usize,
        max: usize,
    },
    #[error("sequence start {start} does not fit below {capacity}")]
    StartOutOfRange { start: u64, capacity: u64 },
}
