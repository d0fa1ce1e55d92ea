//! User ID Value Object
//!
//! Typed wrapper over UUID v4, shared with the kernel so every crate
//! names the same type.

pub use kernel::id::UserId;
