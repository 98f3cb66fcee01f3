use crate::Generator;
use std::sync::atomic::{AtomicU64, Ordering};
use tinyfix_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use tinyfix_core::{ShortCode, ALPHABET};

/// Number of distinct values an 8-symbol code can hold (64^8).
const CODE_SPACE: u64 = 1 << 48;

/// A deterministic short code generator using a sequential counter.
///
/// The counter is rendered in the 64-symbol alphabet and left-padded with
/// `ALPHABET[0]` to the minimum code length, so the first codes are
/// `"----"`, `"---_"`, `"---a"`, ... The counter wraps after 64^8 values.
///
/// Two generators started at the same offset emit identical codes, which
/// makes this generator handy for provoking allocation conflicts on purpose.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

impl SeqGenerator {
    pub fn new() -> Self {
        Self::with_offset(0)
    }

    /// Creates a generator starting from a specific counter value.
    ///
    /// Generators with overlapping offsets propose the same codes, so tests
    /// pick offsets to decide exactly which candidates collide.
    pub fn with_offset(offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
        }
    }

    fn encode(value: u64) -> String {
        let mut n = value % CODE_SPACE;
        let mut symbols = Vec::with_capacity(MAX_LENGTH);
        loop {
            symbols.push(ALPHABET[(n % 64) as usize]);
            n /= 64;
            if n == 0 {
                break;
            }
        }
        while symbols.len() < MIN_LENGTH {
            symbols.push(ALPHABET[0]);
        }
        symbols.iter().rev().map(|&b| b as char).collect()
    }
}

impl Default for SeqGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortCode::new_unchecked(Self::encode(count))
    }
}
