//! Cryptographic utilities
//!
//! Provides the SHA-256 hashing helpers behind wallet address derivation.

pub mod hash;

pub use hash::{double_sha256, sha256, sha256_hex};
