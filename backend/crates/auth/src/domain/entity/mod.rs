//! Entity Module

pub mod credential;
pub mod imported_user;
pub mod user;
