//! End-to-end hashing and verification behaviour, including stored blobs in
//! the legacy packed-parameter layout.

use keyward_hasher::envelope;
use keyward_hasher::{
    CostConfig, CostParams, HashError, HashLayout, HasherPool, InnerHash, PoolConfig,
    ScryptEncoder, ScryptPasswordHasher, Verification,
};

fn config(iteration_count: u32, block_size: u32, thread_count: u32) -> CostConfig {
    CostConfig {
        iteration_count,
        block_size,
        thread_count,
        hash_prefix: 0x02,
    }
}

fn hasher(config: CostConfig) -> ScryptPasswordHasher {
    ScryptPasswordHasher::new(config).unwrap()
}

/// Build a stored blob whose inner hash uses the legacy `$s1$` layout.
fn legacy_blob(password: &str, params: CostParams, tag: u8) -> String {
    let modern = ScryptEncoder::default().encode(password, &params).unwrap();
    let parsed = InnerHash::parse(&modern).unwrap();
    let legacy =
        InnerHash::legacy(params, parsed.salt().to_vec(), parsed.digest().to_vec()).unwrap();
    envelope::seal(tag, &legacy.to_string())
}

#[test]
fn login_scenario_with_policy_change() {
    let original = hasher(config(16384, 8, 1));
    let blob = original.hash_password("P@ssw0rd!").unwrap();

    assert_eq!(
        original.verify_hashed_password(&blob, "P@ssw0rd!").unwrap(),
        Verification::Match
    );

    let upgraded = hasher(config(32768, 8, 1));
    assert_eq!(
        upgraded.verify_hashed_password(&blob, "P@ssw0rd!").unwrap(),
        Verification::MatchStaleParameters
    );

    assert_eq!(
        upgraded.verify_hashed_password(&blob, "wrong").unwrap(),
        Verification::NoMatch
    );
    assert_eq!(
        original.verify_hashed_password(&blob, "wrong").unwrap(),
        Verification::NoMatch
    );

    // Rehashing under the new policy clears the signal.
    let fresh = upgraded.hash_password("P@ssw0rd!").unwrap();
    assert_eq!(
        upgraded.verify_hashed_password(&fresh, "P@ssw0rd!").unwrap(),
        Verification::Match
    );
}

#[test]
fn fresh_blobs_always_match_without_rehash() {
    let h = hasher(config(1024, 8, 1));
    for password in ["a", "hunter2", "pässwörd ✓", "with spaces inside", "$s2$looks$like$a$hash"] {
        let blob = h.hash_password(password).unwrap();
        assert_eq!(
            h.verify_hashed_password(&blob, password).unwrap(),
            Verification::Match,
            "password {password:?}"
        );
    }
}

#[test]
fn different_passwords_do_not_match() {
    let h = hasher(config(1024, 8, 1));
    let blob = h.hash_password("alpha").unwrap();
    for candidate in ["Alpha", "alpha ", "alph", "beta"] {
        assert_eq!(
            h.verify_hashed_password(&blob, candidate).unwrap(),
            Verification::NoMatch,
            "candidate {candidate:?}"
        );
    }
}

#[test]
fn any_param_change_signals_rehash() {
    let blob = hasher(config(1024, 8, 1)).hash_password("pw").unwrap();
    for current in [config(2048, 8, 1), config(1024, 4, 1), config(1024, 8, 2)] {
        assert_eq!(
            hasher(current.clone())
                .verify_hashed_password(&blob, "pw")
                .unwrap(),
            Verification::MatchStaleParameters,
            "current config {current:?}"
        );
    }
}

#[test]
fn legacy_blob_verifies_and_matches_current_params() {
    let params = config(1024, 8, 1).params();
    let blob = legacy_blob("legacy-secret", params, 0x01);

    let h = hasher(config(1024, 8, 1));
    assert_eq!(
        h.verify_hashed_password(&blob, "legacy-secret").unwrap(),
        Verification::Match
    );
    assert_eq!(
        h.verify_hashed_password(&blob, "not-it").unwrap(),
        Verification::NoMatch
    );
}

#[test]
fn legacy_blob_with_outdated_params_signals_rehash() {
    let blob = legacy_blob("legacy-secret", config(1024, 8, 1).params(), 0x01);
    let h = hasher(config(16384, 8, 1));
    assert_eq!(
        h.verify_hashed_password(&blob, "legacy-secret").unwrap(),
        Verification::MatchStaleParameters
    );

    // The replacement blob uses the modern layout.
    let fresh = h.hash_password("legacy-secret").unwrap();
    let inner = InnerHash::parse(&envelope::open(&fresh).unwrap().inner).unwrap();
    assert_eq!(inner.layout(), HashLayout::ModernDelimited);
}

#[test]
fn legacy_and_modern_blobs_decode_to_same_params() {
    let params = config(2048, 4, 2).params();
    let legacy = legacy_blob("pw", params, 0x01);
    let modern = hasher(config(2048, 4, 2)).hash_password("pw").unwrap();

    let legacy = InnerHash::parse(&envelope::open(&legacy).unwrap().inner).unwrap();
    let modern = InnerHash::parse(&envelope::open(&modern).unwrap().inner).unwrap();

    assert_eq!(legacy.layout(), HashLayout::LegacyPacked);
    assert_eq!(legacy.version(), 1);
    assert_eq!(modern.layout(), HashLayout::ModernDelimited);
    assert_eq!(modern.version(), 2);
    assert_eq!(legacy.params(), modern.params());
}

#[test]
fn verify_is_idempotent() {
    let h = hasher(config(1024, 8, 1));
    let blob = h.hash_password("repeat").unwrap();
    let stale = hasher(config(2048, 8, 1));
    for _ in 0..3 {
        assert_eq!(
            h.verify_hashed_password(&blob, "repeat").unwrap(),
            Verification::Match
        );
        assert_eq!(
            stale.verify_hashed_password(&blob, "repeat").unwrap(),
            Verification::MatchStaleParameters
        );
        assert_eq!(
            h.verify_hashed_password(&blob, "other").unwrap(),
            Verification::NoMatch
        );
    }
}

#[test]
fn undecodable_blob_is_no_match_not_error() {
    let h = hasher(config(1024, 8, 1));
    for blob in ["@@@not-base64@@@", "abc", "$s2$1024$8$1$AAAA$AAAA"] {
        assert_eq!(
            h.verify_hashed_password(blob, "pw").unwrap(),
            Verification::NoMatch,
            "blob {blob:?}"
        );
    }
}

#[test]
fn empty_password_is_invalid_input() {
    let h = hasher(config(1024, 8, 1));
    assert!(matches!(
        h.hash_password("").unwrap_err(),
        HashError::InvalidInput(_)
    ));
    assert!(matches!(
        h.verify_hashed_password("AAAA", "").unwrap_err(),
        HashError::InvalidInput(_)
    ));
}

#[tokio::test]
async fn concurrent_verifications_through_pool() {
    let pool = HasherPool::fixed(config(1024, 8, 1), &PoolConfig { max_concurrent: 2 });
    let blob = pool.hash_password("shared").await.unwrap();

    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let pool = pool.clone();
            let blob = blob.clone();
            tokio::spawn(async move {
                let candidate = if i % 2 == 0 { "shared" } else { "other" };
                (i, pool.verify_hashed_password(&blob, candidate).await)
            })
        })
        .collect();

    for task in tasks {
        let (i, result) = task.await.unwrap();
        let expected = if i % 2 == 0 {
            Verification::Match
        } else {
            Verification::NoMatch
        };
        assert_eq!(result.unwrap(), expected);
    }
    assert_eq!(pool.available_permits(), 2);
}
