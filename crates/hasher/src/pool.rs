use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Semaphore, watch};
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::CostConfig;
use crate::error::HashError;
use crate::hasher::{ScryptPasswordHasher, Verification};

/// Admission limits for [`HasherPool`].
///
/// # Examples
///
/// ```
/// use keyward_hasher::PoolConfig;
///
/// let config = PoolConfig { max_concurrent: 4 };
/// assert_eq!(config.max_concurrent, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of derivations running at once. Each one holds
    /// `128 * r * N` bytes of working memory, so size this to available RAM.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_max_concurrent() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Runs hashing and verification on blocking threads, bounded by a
/// [`Semaphore`].
///
/// The cost configuration comes from a [`watch`] channel and is snapshotted
/// once at the start of each call, so a concurrent update never changes the
/// parameters a call is already using.
#[derive(Debug, Clone)]
pub struct HasherPool {
    config: watch::Receiver<CostConfig>,
    permits: Arc<Semaphore>,
}

impl HasherPool {
    /// Create a pool that follows a live configuration channel.
    pub fn new(config: watch::Receiver<CostConfig>, pool: &PoolConfig) -> Self {
        Self {
            config,
            permits: Arc::new(Semaphore::new(pool.max_concurrent.max(1))),
        }
    }

    /// Create a pool with a configuration that never changes.
    pub fn fixed(config: CostConfig, pool: &PoolConfig) -> Self {
        let (_tx, rx) = watch::channel(config);
        Self::new(rx, pool)
    }

    /// The configuration the next call will use.
    pub fn snapshot(&self) -> CostConfig {
        self.config.borrow().clone()
    }

    /// Number of derivations that could start right now.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Hash `password` under the current configuration snapshot.
    pub async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        let hasher = ScryptPasswordHasher::new(self.snapshot())?;
        let password = Zeroizing::new(password.to_owned());
        self.run(move || hasher.hash_password(&password)).await
    }

    /// Verify `password` against `blob` under the current configuration
    /// snapshot.
    pub async fn verify_hashed_password(
        &self,
        blob: &str,
        password: &str,
    ) -> Result<Verification, HashError> {
        let hasher = ScryptPasswordHasher::new(self.snapshot())?;
        let blob = blob.to_owned();
        let password = Zeroizing::new(password.to_owned());
        self.run(move || hasher.verify_hashed_password(&blob, &password))
            .await
    }

    /// Run `work` on a blocking thread once a permit is available.
    ///
    /// The permit moves into the blocking task, so dropping the returned
    /// future (e.g. on a caller timeout) does not free the slot until the
    /// derivation itself has finished.
    async fn run<T, F>(&self, work: F) -> Result<T, HashError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, HashError> + Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| HashError::Worker(format!("semaphore closed: {e}")))?;
        debug!(
            available = self.permits.available_permits(),
            "hashing permit acquired"
        );

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            work()
        })
        .await
        .map_err(|e| HashError::Worker(format!("task join error: {e}")))?
    }
}
