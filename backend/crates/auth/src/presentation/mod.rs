//! Presentation Layer
//!
//! HTTP handlers, DTOs, and routing.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::{auth_router, auth_router_generic};
