//! Parser and printer for the scrypt inner hash string.
//!
//! Two layouts exist, selected by the version digit in the marker field:
//!
//! - Legacy (`s0`, `s1`): `$s1$<packed-hex>$<salt-b64>$<digest-b64>` where the
//!   packed field holds `N` in bits 16–31, `r` in bits 8–15 and `p` in
//!   bits 0–7.
//! - Modern (`s2` and later): `$s2$<N>$<r>$<p>$<salt-b64>$<digest-b64>`.
//!
//! New hashes are always written in the modern layout. Legacy hashes are only
//! ever parsed (and printed back, which tests rely on).

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use crate::config::CostParams;
use crate::error::HashError;

/// Field separator of the inner hash string.
pub const DELIMITER: char = '$';

/// Version written by [`InnerHash::modern`].
pub const CURRENT_VERSION: u8 = 2;

/// Version written by [`InnerHash::legacy`].
pub const LEGACY_VERSION: u8 = 1;

/// Which field layout an inner hash uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashLayout {
    /// Single hexadecimal field carrying the packed cost triple.
    LegacyPacked,
    /// One decimal field per cost parameter.
    ModernDelimited,
}

impl HashLayout {
    /// Select the layout for a version marker digit.
    pub fn for_version(version: u8) -> Self {
        if version >= 2 {
            Self::ModernDelimited
        } else {
            Self::LegacyPacked
        }
    }

    /// Number of `$`-separated fields, including the empty leading one.
    fn field_count(self) -> usize {
        match self {
            Self::LegacyPacked => 5,
            Self::ModernDelimited => 7,
        }
    }
}

impl fmt::Display for HashLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyPacked => f.write_str("legacy-packed"),
            Self::ModernDelimited => f.write_str("modern-delimited"),
        }
    }
}

/// A parsed scrypt inner hash string.
#[derive(Clone, PartialEq, Eq)]
pub enum InnerHash {
    /// `$s0$` / `$s1$`: cost triple packed into one hex field.
    LegacyPacked {
        version: u8,
        packed: u64,
        salt: Vec<u8>,
        digest: Vec<u8>,
    },
    /// `$s2$` and later: one decimal field per cost parameter.
    ModernDelimited {
        version: u8,
        params: CostParams,
        salt: Vec<u8>,
        digest: Vec<u8>,
    },
}

impl InnerHash {
    /// Build a current-version hash.
    pub fn modern(params: CostParams, salt: Vec<u8>, digest: Vec<u8>) -> Self {
        Self::ModernDelimited {
            version: CURRENT_VERSION,
            params,
            salt,
            digest,
        }
    }

    /// Build a legacy packed-parameter hash.
    ///
    /// Fails when a parameter does not fit its bit field.
    pub fn legacy(params: CostParams, salt: Vec<u8>, digest: Vec<u8>) -> Result<Self, HashError> {
        Ok(Self::LegacyPacked {
            version: LEGACY_VERSION,
            packed: pack_params(&params)?,
            salt,
            digest,
        })
    }

    /// Parse an inner hash string.
    ///
    /// Any structural problem is reported as [`HashError::CorruptHash`].
    pub fn parse(encoded: &str) -> Result<Self, HashError> {
        let parts: Vec<&str> = encoded.split(DELIMITER).collect();
        if parts.len() < 2 || !parts[0].is_empty() {
            return Err(corrupt("missing leading delimiter"));
        }

        let version = parse_marker(parts[1])?;
        let layout = HashLayout::for_version(version);
        if parts.len() != layout.field_count() {
            return Err(corrupt(format!(
                "{layout} hash needs {} fields, got {}",
                layout.field_count(),
                parts.len()
            )));
        }

        match layout {
            HashLayout::ModernDelimited => Ok(Self::ModernDelimited {
                version,
                params: CostParams {
                    iteration_count: parse_decimal(parts[2], "iteration_count")?,
                    block_size: parse_decimal(parts[3], "block_size")?,
                    thread_count: parse_decimal(parts[4], "thread_count")?,
                },
                salt: decode_field(parts[5], "salt")?,
                digest: decode_field(parts[6], "digest")?,
            }),
            HashLayout::LegacyPacked => {
                let packed = u64::from_str_radix(parts[2], 16).map_err(|e| {
                    corrupt(format!("invalid packed parameters '{}': {e}", parts[2]))
                })?;
                Ok(Self::LegacyPacked {
                    version,
                    packed,
                    salt: decode_field(parts[3], "salt")?,
                    digest: decode_field(parts[4], "digest")?,
                })
            }
        }
    }

    /// Version digit from the marker field.
    pub fn version(&self) -> u8 {
        match self {
            Self::LegacyPacked { version, .. } | Self::ModernDelimited { version, .. } => *version,
        }
    }

    /// Field layout implied by the version.
    pub fn layout(&self) -> HashLayout {
        match self {
            Self::LegacyPacked { .. } => HashLayout::LegacyPacked,
            Self::ModernDelimited { .. } => HashLayout::ModernDelimited,
        }
    }

    /// The cost triple the hash was derived with.
    pub fn params(&self) -> CostParams {
        match self {
            Self::LegacyPacked { packed, .. } => unpack_params(*packed),
            Self::ModernDelimited { params, .. } => *params,
        }
    }

    /// Decoded salt bytes.
    pub fn salt(&self) -> &[u8] {
        match self {
            Self::LegacyPacked { salt, .. } | Self::ModernDelimited { salt, .. } => salt,
        }
    }

    /// Decoded derived key; its length is whatever was stored.
    pub fn digest(&self) -> &[u8] {
        match self {
            Self::LegacyPacked { digest, .. } | Self::ModernDelimited { digest, .. } => digest,
        }
    }
}

impl fmt::Display for InnerHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LegacyPacked {
                version,
                packed,
                salt,
                digest,
            } => write!(
                f,
                "$s{version}${packed:x}${}${}",
                B64.encode(salt),
                B64.encode(digest)
            ),
            Self::ModernDelimited {
                version,
                params,
                salt,
                digest,
            } => write!(
                f,
                "$s{version}${}${}${}${}${}",
                params.iteration_count,
                params.block_size,
                params.thread_count,
                B64.encode(salt),
                B64.encode(digest)
            ),
        }
    }
}

impl fmt::Debug for InnerHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InnerHash")
            .field("version", &self.version())
            .field("layout", &self.layout())
            .field("params", &self.params())
            .field("salt", &"[REDACTED]")
            .field("digest", &"[REDACTED]")
            .finish()
    }
}

/// Pack a cost triple into the legacy 64-bit layout.
pub fn pack_params(params: &CostParams) -> Result<u64, HashError> {
    if params.iteration_count > 0xffff || params.block_size > 0xff || params.thread_count > 0xff {
        return Err(HashError::InvalidConfig(format!(
            "parameters N={} r={} p={} do not fit the legacy packed layout",
            params.iteration_count, params.block_size, params.thread_count
        )));
    }
    Ok((u64::from(params.iteration_count) << 16)
        | (u64::from(params.block_size) << 8)
        | u64::from(params.thread_count))
}

/// Unpack the legacy 64-bit layout. Bits above 31 are ignored.
#[allow(clippy::cast_possible_truncation)]
pub fn unpack_params(packed: u64) -> CostParams {
    // Each value is masked to its field width before narrowing.
    CostParams {
        iteration_count: ((packed >> 16) & 0xffff) as u32,
        block_size: ((packed >> 8) & 0xff) as u32,
        thread_count: (packed & 0xff) as u32,
    }
}

fn parse_marker(marker: &str) -> Result<u8, HashError> {
    let bytes = marker.as_bytes();
    if bytes.len() != 2 || bytes[0] != b's' || !bytes[1].is_ascii_digit() {
        return Err(corrupt(format!("invalid version marker '{marker}'")));
    }
    Ok(bytes[1] - b'0')
}

fn parse_decimal(field: &str, name: &str) -> Result<u32, HashError> {
    field
        .parse()
        .map_err(|e| corrupt(format!("invalid {name} '{field}': {e}")))
}

fn decode_field(field: &str, name: &str) -> Result<Vec<u8>, HashError> {
    let bytes = B64
        .decode(field)
        .map_err(|e| corrupt(format!("invalid base64 in {name}: {e}")))?;
    if bytes.is_empty() {
        return Err(corrupt(format!("{name} is empty")));
    }
    Ok(bytes)
}

fn corrupt(msg: impl Into<String>) -> HashError {
    HashError::CorruptHash(msg.into())
}
