//! Credential hashing adapters.

mod bcrypt_hasher;

pub use bcrypt_hasher::{BcryptCredentialHasher, DEFAULT_COST, MIN_COST};
