use thiserror::Error;

/// Errors returned when configuring a generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid code length range {min}..={max}; expected {lower}..={upper} with min <= max")]
    InvalidLength {
        min: usize,
        max: usize,
        lower: usize,
        upper: usize,
    },
}
