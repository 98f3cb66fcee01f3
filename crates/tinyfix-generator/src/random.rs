use crate::error::Error;
use crate::Generator;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tinyfix_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use tinyfix_core::{ShortCode, ALPHABET};
use typed_builder::TypedBuilder;

/// How long generated codes are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLength {
    /// Each code picks its length uniformly from `min..=max`.
    Range { min: usize, max: usize },
    /// Every code has exactly this length.
    Fixed(usize),
}

impl CodeLength {
    pub fn bounds(&self) -> (usize, usize) {
        match *self {
            CodeLength::Range { min, max } => (min, max),
            CodeLength::Fixed(len) => (len, len),
        }
    }

    fn validate(&self) -> Result<(), Error> {
        let (min, max) = self.bounds();
        if min < MIN_LENGTH || max > MAX_LENGTH || min > max {
            return Err(Error::InvalidLength {
                min,
                max,
                lower: MIN_LENGTH,
                upper: MAX_LENGTH,
            });
        }
        Ok(())
    }
}

impl Default for CodeLength {
    fn default() -> Self {
        CodeLength::Range {
            min: MIN_LENGTH,
            max: MAX_LENGTH,
        }
    }
}

/// Configures a [`RandomGenerator`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct GeneratorSettings {
    #[builder(default)]
    pub length: CodeLength,
    /// Seed for a reproducible stream of codes.
    ///
    /// Two generators built with the same seed emit the same codes in the same
    /// order. Leave unset in production so every process draws from its own
    /// thread-local RNG.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Draws codes uniformly from the 64-symbol alphabet.
///
/// The goal is collision avoidance, not unguessability.
pub struct RandomGenerator {
    min: usize,
    max: usize,
    seeded: Option<Mutex<StdRng>>,
}

impl RandomGenerator {
    pub fn new(settings: GeneratorSettings) -> Result<Self, Error> {
        settings.length.validate()?;
        let (min, max) = settings.length.bounds();

        Ok(Self {
            min,
            max,
            seeded: settings
                .seed
                .map(|seed| Mutex::new(StdRng::seed_from_u64(seed))),
        })
    }

    /// Shorthand for a seeded generator with the default length range.
    pub fn seeded(seed: u64) -> Self {
        Self {
            min: MIN_LENGTH,
            max: MAX_LENGTH,
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> ShortCode {
        let len = rng.random_range(self.min..=self.max);
        let code: String = (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            min: MIN_LENGTH,
            max: MAX_LENGTH,
            seeded: None,
        }
    }
}

impl std::fmt::Debug for RandomGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomGenerator")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("seeded", &self.seeded.is_some())
            .finish()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        match &self.seeded {
            Some(rng) => self.draw(&mut *rng.lock()),
            None => self.draw(&mut rand::rng()),
        }
    }
}
