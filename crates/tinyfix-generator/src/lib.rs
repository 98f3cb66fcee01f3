pub mod error;
pub mod random;
pub mod seq;

pub use error::Error;
pub use random::{CodeLength, GeneratorSettings, RandomGenerator};
pub use seq::SeqGenerator;

use tinyfix_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// A generated code is only a candidate: uniqueness is enforced when the
/// allocator commits it, so generators aim for few collisions rather than
/// none.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Generates a candidate that can be converted into a short code.
    fn generate(&self) -> Self::Output;
}

impl<G: Generator + ?Sized> Generator for std::sync::Arc<G> {
    type Output = G::Output;

    fn generate(&self) -> Self::Output {
        (**self).generate()
    }
}
