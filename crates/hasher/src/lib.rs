//! Versioned, parameter-adaptive scrypt password hashing.
//!
//! Passwords are stored as opaque blobs:
//!
//! ```text
//! base64( tag-byte || "$s2$<N>$<r>$<p>$<salt-b64>$<digest-b64>" )
//! ```
//!
//! The tag byte is the configured `hash_prefix`; it versions the outer
//! envelope and is ignored during verification. The inner string is
//! self-describing, and both its modern layout and the legacy packed-parameter
//! layout (`$s1$<hex>$<salt>$<digest>`) remain verifiable indefinitely.
//!
//! Verification reports one of three outcomes (see [`Verification`]). A
//! successful match whose stored cost parameters differ from the current
//! [`CostConfig`] yields [`Verification::MatchStaleParameters`], telling the
//! caller to hash the password again and persist the new blob.
//!
//! ```
//! use keyward_hasher::{CostConfig, ScryptPasswordHasher, Verification};
//!
//! let config = CostConfig { iteration_count: 1024, ..CostConfig::default() };
//! let hasher = ScryptPasswordHasher::new(config).unwrap();
//!
//! let blob = hasher.hash_password("P@ssw0rd!").unwrap();
//! assert_eq!(
//!     hasher.verify_hashed_password(&blob, "P@ssw0rd!").unwrap(),
//!     Verification::Match,
//! );
//! assert_eq!(
//!     hasher.verify_hashed_password(&blob, "wrong").unwrap(),
//!     Verification::NoMatch,
//! );
//! ```

mod config;
pub mod envelope;
mod error;
pub mod format;
mod hasher;
pub mod kdf;
#[cfg(feature = "pool")]
mod pool;

pub use config::{CostConfig, CostParams, MAX_MEMORY_BYTES};
pub use error::HashError;
pub use format::{HashLayout, InnerHash};
pub use hasher::{ScryptPasswordHasher, Verification, rehash_needed};
pub use kdf::ScryptEncoder;
#[cfg(feature = "pool")]
pub use pool::{HasherPool, PoolConfig};
