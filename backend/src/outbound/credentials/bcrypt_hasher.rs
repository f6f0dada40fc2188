//! bcrypt credential secrets.
//!
//! Secrets use the modular crypt format (`$2b$<cost>$<salt><digest>`), so the
//! work factor travels with each stored value and can be raised without
//! invalidating older secrets.

use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Work factor applied to new secrets.
pub const DEFAULT_COST: u32 = 10;

/// Smallest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;

const MAX_COST: u32 = 31;

/// [`CredentialHasher`] backed by the `bcrypt` crate.
///
/// Verification is constant time inside `bcrypt::verify`.
#[derive(Debug, Clone, Copy)]
pub struct BcryptCredentialHasher {
    cost: u32,
}

impl BcryptCredentialHasher {
    /// Hasher at [`DEFAULT_COST`].
    #[must_use]
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Hasher at `cost`, clamped to the range bcrypt supports.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptCredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for BcryptCredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialHasherError> {
        ::bcrypt::hash(password, self.cost)
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))
    }

    fn verify(&self, password: &str, secret: &str) -> Result<bool, CredentialHasherError> {
        ::bcrypt::verify(password, secret)
            .map_err(|err| CredentialHasherError::malformed_secret(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> BcryptCredentialHasher {
        BcryptCredentialHasher::with_cost(MIN_COST)
    }

    #[rstest]
    fn hashed_password_verifies(hasher: BcryptCredentialHasher) {
        let secret = hasher.hash("correct horse").expect("hash");

        assert_eq!(hasher.verify("correct horse", &secret), Ok(true));
        assert_eq!(hasher.verify("wrong horse", &secret), Ok(false));
    }

    #[rstest]
    fn salts_differ_between_hashes(hasher: BcryptCredentialHasher) {
        assert_ne!(
            hasher.hash("same").expect("hash"),
            hasher.hash("same").expect("hash")
        );
    }

    #[rstest]
    fn secret_records_its_work_factor(hasher: BcryptCredentialHasher) {
        let secret = hasher.hash("plaintext-password").expect("hash");

        assert!(secret.starts_with("$2b$04$"), "unexpected secret {secret}");
        assert!(!secret.contains("plaintext-password"));
    }

    #[rstest]
    fn secrets_from_other_costs_still_verify(hasher: BcryptCredentialHasher) {
        let secret = BcryptCredentialHasher::with_cost(MIN_COST + 1)
            .hash("pw")
            .expect("hash");

        assert_eq!(hasher.verify("pw", &secret), Ok(true));
    }

    #[rstest]
    #[case(0, MIN_COST)]
    #[case(DEFAULT_COST, DEFAULT_COST)]
    #[case(99, MAX_COST)]
    fn cost_is_clamped(#[case] requested: u32, #[case] expected: u32) {
        assert_eq!(BcryptCredentialHasher::with_cost(requested).cost(), expected);
    }

    #[rstest]
    fn default_cost_matches_the_bootstrap_work_factor() {
        assert_eq!(BcryptCredentialHasher::default().cost(), 10);
    }

    #[rstest]
    #[case("no-separator")]
    #[case("$2b$04$tooshort")]
    #[case("")]
    fn malformed_secrets_are_reported(hasher: BcryptCredentialHasher, #[case] secret: &str) {
        let result = hasher.verify("pw", secret);
        assert!(matches!(
            result,
            Err(CredentialHasherError::MalformedSecret { .. })
        ));
    }
}
