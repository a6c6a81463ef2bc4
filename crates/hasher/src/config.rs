use serde::{Deserialize, Serialize};

use crate::error::HashError;

/// Upper bound on scrypt working memory (`128 * r * N` bytes) for a single
/// derivation. Applies to configured and stored parameters alike.
pub const MAX_MEMORY_BYTES: u64 = 1 << 30;

/// The scrypt cost triple recovered from, or compared against, a stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostParams {
    /// CPU/memory cost `N`. Must be a power of two.
    pub iteration_count: u32,
    /// Block size `r`.
    pub block_size: u32,
    /// Parallelism `p`.
    pub thread_count: u32,
}

impl CostParams {
    /// Check that the triple is usable by the scrypt primitive and stays within
    /// [`MAX_MEMORY_BYTES`].
    pub fn validate(&self) -> Result<(), HashError> {
        if self.iteration_count < 2 || !self.iteration_count.is_power_of_two() {
            return Err(HashError::InvalidConfig(format!(
                "iteration_count must be a power of two >= 2, got {}",
                self.iteration_count
            )));
        }
        if self.block_size == 0 {
            return Err(HashError::InvalidConfig(
                "block_size must be at least 1".to_owned(),
            ));
        }
        if self.thread_count == 0 {
            return Err(HashError::InvalidConfig(
                "thread_count must be at least 1".to_owned(),
            ));
        }
        if u64::from(self.block_size) * u64::from(self.thread_count) >= 1 << 30 {
            return Err(HashError::InvalidConfig(format!(
                "block_size * thread_count must be below 2^30, got {} * {}",
                self.block_size, self.thread_count
            )));
        }
        // scrypt requires N < 2^(128 * r / 8).
        if u64::from(self.log_n()) >= u64::from(self.block_size) * 16 {
            return Err(HashError::InvalidConfig(format!(
                "iteration_count {} is too large for block_size {}",
                self.iteration_count, self.block_size
            )));
        }
        let memory = self.memory_bytes();
        if memory > MAX_MEMORY_BYTES {
            return Err(HashError::InvalidConfig(format!(
                "parameters need {memory} bytes of working memory, limit is {MAX_MEMORY_BYTES}"
            )));
        }
        Ok(())
    }

    /// Base-2 logarithm of `iteration_count`, as the scrypt crate expects it.
    ///
    /// Only meaningful once [`validate`](Self::validate) has succeeded.
    #[allow(clippy::cast_possible_truncation)]
    pub fn log_n(&self) -> u8 {
        // trailing_zeros of a u32 is at most 32.
        self.iteration_count.trailing_zeros() as u8
    }

    /// Approximate working memory in bytes for one derivation.
    pub fn memory_bytes(&self) -> u64 {
        128 * u64::from(self.block_size) * u64::from(self.iteration_count)
    }
}

/// Process-wide scrypt cost configuration.
///
/// Passed by value (or snapshotted from a live channel, see
/// [`HasherPool`](crate::HasherPool)) so that a single call never observes a
/// configuration change half way through.
///
/// # Examples
///
/// ```
/// use keyward_hasher::CostConfig;
///
/// let config = CostConfig::default();
/// assert_eq!(config.iteration_count, 16384);
/// assert_eq!(config.block_size, 8);
/// assert_eq!(config.thread_count, 1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostConfig {
    /// CPU/memory cost `N`.
    #[serde(default = "default_iteration_count")]
    pub iteration_count: u32,
    /// Block size `r`.
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    /// Parallelism `p`.
    #[serde(default = "default_thread_count")]
    pub thread_count: u32,
    /// Tag byte written in front of every new blob.
    #[serde(default = "default_hash_prefix")]
    pub hash_prefix: u8,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            iteration_count: default_iteration_count(),
            block_size: default_block_size(),
            thread_count: default_thread_count(),
            hash_prefix: default_hash_prefix(),
        }
    }
}

impl CostConfig {
    /// The cost triple this configuration produces hashes with.
    pub fn params(&self) -> CostParams {
        CostParams {
            iteration_count: self.iteration_count,
            block_size: self.block_size,
            thread_count: self.thread_count,
        }
    }

    /// Reject configurations the scrypt primitive cannot honour.
    pub fn validate(&self) -> Result<(), HashError> {
        self.params().validate()
    }
}

fn default_iteration_count() -> u32 {
    16384
}

fn default_block_size() -> u32 {
    8
}

fn default_thread_count() -> u32 {
    1
}

fn default_hash_prefix() -> u8 {
    0x02
}
