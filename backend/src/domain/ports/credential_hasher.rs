//! Port for turning passwords into stored credential secrets.

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hasher adapters.
    pub enum CredentialHasherError {
        /// The stored secret could not be interpreted.
        MalformedSecret { message: String } =>
            "stored credential secret is malformed: {message}",
        /// The adapter could not derive a secret.
        Hashing { message: String } => "credential hashing failed: {message}",
    }
}

/// One-way credential digests.
///
/// Secrets must be produced by a slow, salted key-derivation function and
/// compared in constant time.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted secret for `password`.
    fn hash(&self, password: &str) -> Result<String, CredentialHasherError>;

    /// Check `password` against a secret produced by [`Self::hash`].
    fn verify(&self, password: &str, secret: &str) -> Result<bool, CredentialHasherError>;
}
