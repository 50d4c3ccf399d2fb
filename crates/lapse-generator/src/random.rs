use crate::error::Error;
use crate::Generator;
use lapse_core::LinkId;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The bitcoin base58 alphabet: alphanumerics without `0`, `O`, `I`, `l`.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

pub const DEFAULT_WIDTH: usize = 6;
pub const MIN_WIDTH: usize = 4;
pub const MAX_WIDTH: usize = 32;

/// Draws fixed-width ids uniformly from [`ALPHABET`].
///
/// Six characters give 58^6 (about 3.8e10) ids, so collisions only become
/// likely with millions of live links.
#[derive(Debug)]
pub struct RandomGenerator {
    width: usize,
    rng: Mutex<StdRng>,
}

impl RandomGenerator {
    /// Creates a generator with [`DEFAULT_WIDTH`] seeded from the OS.
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a generator producing ids of `width` characters.
    pub fn with_width(width: usize) -> Result<Self, Error> {
        Self::check_width(width)?;
        Ok(Self {
            width,
            rng: Mutex::new(StdRng::from_os_rng()),
        })
    }

    /// Creates a generator with a fixed seed. Two generators with the same
    /// width and seed yield the same sequence.
    pub fn seeded(width: usize, seed: u64) -> Result<Self, Error> {
        Self::check_width(width)?;
        Ok(Self {
            width,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn check_width(width: usize) -> Result<(), Error> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(Error::InvalidWidth {
                width,
                min: MIN_WIDTH,
                max: MAX_WIDTH,
            });
        }
        Ok(())
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = LinkId;

    fn generate(&self) -> Self::Output {
        let mut rng = self.rng.lock();
        let id: String = (0..self.width)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        LinkId::new_unchecked(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_have_fixed_width_and_alphabet() {
        let generator = RandomGenerator::new();

        for _ in 0..1000 {
            let id = generator.generate();
            assert_eq!(id.as_str().len(), DEFAULT_WIDTH);
            assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn custom_width() {
        let generator = RandomGenerator::with_width(10).unwrap();
        assert_eq!(generator.generate().as_str().len(), 10);
    }

    #[test]
    fn width_out_of_range() {
        assert_eq!(
            RandomGenerator::with_width(2).unwrap_err(),
            Error::InvalidWidth {
                width: 2,
                min: MIN_WIDTH,
                max: MAX_WIDTH
            }
        );
        assert!(RandomGenerator::seeded(33, 1).is_err());
    }

    #[test]
    fn seeded_generators_agree() {
        let a = RandomGenerator::seeded(8, 42).unwrap();
        let b = RandomGenerator::seeded(8, 42).unwrap();

        for _ in 0..16 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn mostly_distinct() {
        let generator = RandomGenerator::seeded(DEFAULT_WIDTH, 7).unwrap();
        let ids: HashSet<_> = (0..10_000).map(|_| generator.generate()).collect();
        // 1e4 draws from 3.8e10 ids; a handful of repeats at most
        assert!(ids.len() > 9_990);
    }

    #[test]
    fn alphabet_has_no_ambiguous_characters() {
        for c in [b'0', b'O', b'I', b'l'] {
            assert!(!ALPHABET.contains(&c));
        }
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
