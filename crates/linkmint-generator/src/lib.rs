pub mod error;
pub mod random;
pub mod scripted;

pub use error::GeneratorError;
pub use random::{generate_code, RandomGenerator, ALPHABET, DEFAULT_CODE_LENGTH};
pub use scripted::ScriptedGenerator;

use linkmint_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Nothing here promises uniqueness: the allocator probes the link store and
/// retries on collision.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate code.
    fn generate(&self) -> ShortCode;
}

impl<G: Generator + ?Sized> Generator for std::sync::Arc<G> {
    fn generate(&self) -> ShortCode {
        (**self).generate()
    }
}
