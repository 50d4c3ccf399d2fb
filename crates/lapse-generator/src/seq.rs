use crate::error::Error;
use crate::Generator;
use lapse_core::LinkId;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_DIGITS: u32 = 6;
pub const MAX_DIGITS: u32 = 19;

/// Hands out `<prefix><counter>` ids with the counter zero-padded to a fixed
/// number of digits.
///
/// Every id has the same length. After `10^digits` ids the counter wraps to
/// zero, so old numbers come back and the registry treats them like any other
/// collision.
#[derive(Debug)]
pub struct SeqGenerator {
    prefix: String,
    digits: u32,
    capacity: u64,
    next: AtomicU64,
}

impl SeqGenerator {
    pub fn new(prefix: impl Into<String>, digits: u32) -> Result<Self, Error> {
        if !(1..=MAX_DIGITS).contains(&digits) {
            return Err(Error::InvalidWidth {
                width: digits as usize,
                min: 1,
                max: MAX_DIGITS as usize,
            });
        }

        Ok(Self {
            prefix: prefix.into(),
            digits,
            capacity: 10u64.pow(digits),
            next: AtomicU64::new(0),
        })
    }

    /// Six-digit counter behind `prefix`, starting at zero.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            digits: DEFAULT_DIGITS,
            capacity: 10u64.pow(DEFAULT_DIGITS),
            next: AtomicU64::new(0),
        }
    }

    /// Moves the counter so the next id carries `start`.
    pub fn starting_at(self, start: u64) -> Result<Self, Error> {
        if start >= self.capacity {
            return Err(Error::StartOutOfRange {
                start,
                capacity: self.capacity,
            });
        }
        self.next.store(start, Ordering::Relaxed);
        Ok(self)
    }

    /// Length of every generated id.
    pub fn width(&self) -> usize {
        self.prefix.len() + self.digits as usize
    }

    fn advance(&self) -> u64 {
        let capacity = self.capacity;
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some((n + 1) % capacity)
            })
            .unwrap_or_else(|n| n)
    }
}

impl Generator for SeqGenerator {
    type Output = LinkId;

    fn generate(&self) -> LinkId {
        let n = self.advance();
        LinkId::new_unchecked(format!(
            "{}{:0width$}",
            self.prefix,
            n,
            width = self.digits as usize
        ))
    }
}
