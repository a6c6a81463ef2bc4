use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::{CostConfig, CostParams};
use crate::envelope;
use crate::error::HashError;
use crate::format::InnerHash;
use crate::kdf::ScryptEncoder;

/// Outcome of checking a password against a stored blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    /// Wrong password, or a stored blob that could not be decoded.
    NoMatch,
    /// Correct password, stored with the current cost parameters.
    Match,
    /// Correct password, but stored with different cost parameters. The caller
    /// should hash the password again and persist the new blob.
    MatchStaleParameters,
}

impl Verification {
    pub fn is_match(self) -> bool {
        matches!(self, Self::Match | Self::MatchStaleParameters)
    }

    pub fn needs_rehash(self) -> bool {
        self == Self::MatchStaleParameters
    }
}

/// Whether a hash stored with `stored` must be replaced under `current`.
///
/// Exact equality: lowering the configured cost also triggers a rehash.
pub fn rehash_needed(stored: &CostParams, current: &CostParams) -> bool {
    stored != current
}

/// Hashes and verifies passwords as self-describing, storable blobs.
///
/// Holds an immutable [`CostConfig`]; build a new hasher (or use
/// [`HasherPool`](crate::HasherPool)) to pick up configuration changes.
#[derive(Debug, Clone)]
pub struct ScryptPasswordHasher {
    encoder: ScryptEncoder,
    config: CostConfig,
}

impl ScryptPasswordHasher {
    /// Create a hasher, rejecting configurations scrypt cannot honour.
    pub fn new(config: CostConfig) -> Result<Self, HashError> {
        config.validate()?;
        Ok(Self {
            encoder: ScryptEncoder::default(),
            config,
        })
    }

    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    /// Hash `password` into a blob tagged with the configured hash prefix.
    pub fn hash_password(&self, password: &str) -> Result<String, HashError> {
        require_non_blank(password, "password")?;

        let params = self.config.params();
        let inner = self.encoder.encode(password, &params)?;
        debug!(
            iteration_count = params.iteration_count,
            block_size = params.block_size,
            thread_count = params.thread_count,
            "password hashed"
        );
        Ok(envelope::seal(self.config.hash_prefix, &inner))
    }

    /// Check `password` against a stored `blob`.
    ///
    /// The password is compared before any cost parameter is looked at, so a
    /// failed attempt reveals nothing about how the blob was produced.
    pub fn verify_hashed_password(
        &self,
        blob: &str,
        password: &str,
    ) -> Result<Verification, HashError> {
        require_non_blank(blob, "hashed password")?;
        require_non_blank(password, "password")?;

        let Some(envelope) = envelope::open(blob) else {
            debug!("stored hash is not a valid envelope");
            return Ok(Verification::NoMatch);
        };

        if !self.encoder.compare(password, &envelope.inner) {
            return Ok(Verification::NoMatch);
        }

        let stored = InnerHash::parse(&envelope.inner)
            .inspect_err(|e| error!(error = %e, "stored hash verified but failed to parse"))?
            .params();

        if rehash_needed(&stored, &self.config.params()) {
            info!(
                stored_iteration_count = stored.iteration_count,
                stored_block_size = stored.block_size,
                stored_thread_count = stored.thread_count,
                "password matched with stale cost parameters"
            );
            return Ok(Verification::MatchStaleParameters);
        }
        Ok(Verification::Match)
    }
}

fn require_non_blank(value: &str, what: &str) -> Result<(), HashError> {
    if value.trim().is_empty() {
        return Err(HashError::InvalidInput(format!("{what} must not be empty")));
    }
    Ok(())
}
