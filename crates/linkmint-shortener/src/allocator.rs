use crate::error::{AllocatorError, Result};
use crate::timeout::bounded;
use crate::url::normalize_url;
use linkmint_core::{IndexSink, Link, LinkStore, NewLink, ShortCode, StorageError};
use linkmint_generator::Generator;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Tuning knobs for [`LinkAllocator`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct AllocatorConfig {
    /// How many candidate codes to try before giving up.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// Deadline applied to every link store and sink call.
    #[builder(default = DEFAULT_STORE_TIMEOUT)]
    pub store_timeout: Duration,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Whether a request created a link or found one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationOutcome {
    Created,
    Existing,
}

/// The link returned for a submitted URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub link: Link,
    pub outcome: AllocationOutcome,
}

impl Allocation {
    fn created(link: Link) -> Self {
        Self {
            link,
            outcome: AllocationOutcome::Created,
        }
    }

    fn existing(link: Link) -> Self {
        Self {
            link,
            outcome: AllocationOutcome::Existing,
        }
    }

    pub fn is_created(&self) -> bool {
        self.outcome == AllocationOutcome::Created
    }
}

/// Assigns short codes to URLs.
///
/// The link store is the only arbiter of uniqueness. The allocator holds no
/// locks: a code that passes the existence probe can still be lost to a
/// concurrent request, in which case `create` reports a conflict and the
/// allocator simply moves on to the next candidate. New links are then
/// mirrored to the sink on a best-effort basis.
#[derive(Debug)]
pub struct LinkAllocator<S: ?Sized, K: ?Sized, G: ?Sized> {
    store: Arc<S>,
    sink: Arc<K>,
    generator: Arc<G>,
    config: AllocatorConfig,
}

impl<S: ?Sized, K: ?Sized, G: ?Sized> Clone for LinkAllocator<S, K, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sink: Arc::clone(&self.sink),
            generator: Arc::clone(&self.generator),
            config: self.config.clone(),
        }
    }
}

impl<S, K, G> LinkAllocator<S, K, G>
where
    S: LinkStore + ?Sized,
    K: IndexSink + ?Sized,
    G: Generator + ?Sized,
{
    pub fn new(store: Arc<S>, sink: Arc<K>, generator: Arc<G>, config: AllocatorConfig) -> Self {
        Self {
            store,
            sink,
            generator,
            config,
        }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Returns the link for `original_url`, creating it on first submission.
    ///
    /// Repeated submissions of the same URL return the same link with
    /// [`AllocationOutcome::Existing`].
    pub async fn get_or_create_short_link(&self, original_url: &str) -> Result<Allocation> {
        let url = normalize_url(original_url)?;

        if let Some(link) = self.find_by_url(&url).await? {
            debug!(code = %link.short_code, "url already shortened");
            return Ok(Allocation::existing(link));
        }

        let max_attempts = self.config.max_attempts;
        for attempt in 1..=max_attempts {
            let candidate = self.generator.generate();

            if self.exists(&candidate).await? {
                debug!(code = %candidate, attempt, "generated code is taken, retrying");
                continue;
            }

            let new_link = NewLink {
                original_url: url.clone(),
                short_code: candidate,
            };

            match self.create(new_link).await {
                Ok(link) => {
                    info!(code = %link.short_code, id = link.id, attempt, "created short link");
                    self.mirror(&link).await;
                    return Ok(Allocation::created(link));
                }
                Err(StorageError::CodeConflict(code)) => {
                    debug!(code = %code, attempt, "lost race for short code, retrying");
                }
                Err(StorageError::UrlConflict(_)) => {
                    // A concurrent request created this URL after our dedup read.
                    return match self.find_by_url(&url).await? {
                        Some(link) => {
                            debug!(code = %link.short_code, "url created concurrently");
                            Ok(Allocation::existing(link))
                        }
                        None => Err(StorageError::InvalidData(format!(
                            "url conflict reported but no link found for '{}'",
                            url
                        ))
                        .into()),
                    };
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(attempts = max_attempts, "exhausted short code attempts");
        Err(AllocatorError::CodeSpaceExhausted {
            attempts: max_attempts,
        })
    }

    /// Looks up the link for a short code.
    pub async fn resolve(&self, code: &ShortCode) -> Result<Option<Link>> {
        trace!(code = %code, "resolving short code");
        let link = bounded(
            "find_by_code",
            self.config.store_timeout,
            self.store.find_by_code(code),
        )
        .await?;
        Ok(link)
    }

    /// Returns up to `limit` links, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<Link>> {
        let links = bounded("list", self.config.store_timeout, self.store.list(limit)).await?;
        Ok(links)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>> {
        let link = bounded(
            "find_by_url",
            self.config.store_timeout,
            self.store.find_by_url(url),
        )
        .await?;
        Ok(link)
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = bounded("exists", self.config.store_timeout, self.store.exists(code)).await?;
        Ok(exists)
    }

    async fn create(&self, link: NewLink) -> std::result::Result<Link, StorageError> {
        bounded("create", self.config.store_timeout, self.store.create(link)).await
    }

    /// Mirrors a new link into the sink. Failures are logged and dropped.
    async fn mirror(&self, link: &Link) {
        let result = bounded(
            "put_link",
            self.config.store_timeout,
            self.sink.put_link(&link.short_code, &link.original_url),
        )
        .await;

        match result {
            Ok(()) => trace!(code = %link.short_code, "mirrored link to secondary index"),
            Err(e) => warn!(
                code = %link.short_code,
                error = %e,
                "failed to mirror link to secondary index"
            ),
        }
    }
}
