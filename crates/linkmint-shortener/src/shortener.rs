use crate::allocator::{Allocation, LinkAllocator};
use crate::error::Result;
use async_trait::async_trait;
use linkmint_core::{IndexSink, Link, LinkStore, ShortCode};
use linkmint_generator::Generator;

/// Object-safe facade over [`LinkAllocator`] for transport layers.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the link for `original_url`, creating it if needed.
    async fn shorten(&self, original_url: &str) -> Result<Allocation>;

    /// Resolves a short code to its link.
    async fn resolve(&self, code: &ShortCode) -> Result<Option<Link>>;

    /// Returns up to `limit` links, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<Link>>;
}

#[async_trait]
impl<S, K, G> Shortener for LinkAllocator<S, K, G>
where
    S: LinkStore + ?Sized,
    K: IndexSink + ?Sized,
    G: Generator + ?Sized,
{
    async fn shorten(&self, original_url: &str) -> Result<Allocation> {
        self.get_or_create_short_link(original_url).await
    }

    async fn resolve(&self, code: &ShortCode) -> Result<Option<Link>> {
        LinkAllocator::resolve(self, code).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Link>> {
        LinkAllocator::recent(self, limit).await
    }
}
