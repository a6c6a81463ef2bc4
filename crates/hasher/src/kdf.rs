//! The scrypt primitive, framed as a self-describing inner hash string.

use rand_core::{OsRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::config::CostParams;
use crate::error::HashError;
use crate::format::InnerHash;

/// Salt length for new hashes, in bytes.
pub const SALT_LEN: usize = 32;

/// Derived key length for new hashes, in bytes.
pub const DIGEST_LEN: usize = 64;

/// Shortest stored digest [`ScryptEncoder::compare`] will accept.
pub const MIN_DIGEST_LEN: usize = 16;

/// Derives and compares scrypt hashes in the inner string format.
///
/// The cost parameters are passed on every call; the encoder only carries the
/// salt and digest sizes used for new hashes.
#[derive(Debug, Clone, Copy)]
pub struct ScryptEncoder {
    salt_len: usize,
    digest_len: usize,
}

impl Default for ScryptEncoder {
    fn default() -> Self {
        Self {
            salt_len: SALT_LEN,
            digest_len: DIGEST_LEN,
        }
    }
}

impl ScryptEncoder {
    /// Hash `password` with a fresh random salt, producing a modern-layout
    /// inner hash string.
    pub fn encode(&self, password: &str, params: &CostParams) -> Result<String, HashError> {
        let mut salt = vec![0u8; self.salt_len];
        OsRng.fill_bytes(&mut salt);
        self.encode_with_salt(password, params, salt)
    }

    /// Hash `password` with a caller-provided salt.
    pub fn encode_with_salt(
        &self,
        password: &str,
        params: &CostParams,
        salt: Vec<u8>,
    ) -> Result<String, HashError> {
        let digest = derive(password.as_bytes(), &salt, params, self.digest_len)?;
        Ok(InnerHash::modern(*params, salt, digest.to_vec()).to_string())
    }

    /// Check `password` against an inner hash string in constant time.
    ///
    /// Returns `false` for a wrong password and for any hash that cannot be
    /// parsed or whose parameters are unusable. The stored digest length is
    /// honoured, so hashes written with other digest sizes still verify.
    pub fn compare(&self, password: &str, encoded: &str) -> bool {
        let Ok(hash) = InnerHash::parse(encoded) else {
            return false;
        };
        if hash.digest().len() < MIN_DIGEST_LEN {
            return false;
        }
        let params = hash.params();
        let Ok(derived) = derive(password.as_bytes(), hash.salt(), &params, hash.digest().len())
        else {
            return false;
        };
        derived.as_slice().ct_eq(hash.digest()).into()
    }
}

/// Run scrypt with `params`, returning a key of `len` bytes that is wiped on
/// drop.
///
/// Parameters outside [`CostParams::validate`] are refused before any memory
/// is allocated. The output length comes from the buffer alone; the length
/// carried by `scrypt::Params` only matters for PHC strings and is capped at
/// 64 there.
fn derive(
    password: &[u8],
    salt: &[u8],
    params: &CostParams,
    len: usize,
) -> Result<Zeroizing<Vec<u8>>, HashError> {
    params.validate()?;
    let scrypt_params = scrypt::Params::new(
        params.log_n(),
        params.block_size,
        params.thread_count,
        DIGEST_LEN,
    )
    .map_err(|e| HashError::Derivation(format!("invalid scrypt parameters: {e}")))?;

    let mut output = Zeroizing::new(vec![0u8; len]);
    scrypt::scrypt(password, salt, &scrypt_params, &mut output)
        .map_err(|e| HashError::Derivation(format!("invalid output length: {e}")))?;
    Ok(output)
}
