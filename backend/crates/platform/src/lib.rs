//! Platform - cryptographic primitives shared across the backend
//!
//! - `password` - Argon2id hashing and verification for the current
//!   credential scheme
//! - `legacy` - verification of bcrypt digests imported from the
//!   previous system (verify-only, never used for new hashes)

pub mod legacy;
pub mod password;
