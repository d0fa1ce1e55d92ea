//! Application Layer
//!
//! Use cases and application services.

pub mod assign_role;
pub mod config;
pub mod import_users;
pub mod log_in;
pub mod register;
pub mod resolve;
pub mod token;

// Re-exports
pub use assign_role::{AssignRoleInput, AssignRoleUseCase, RoleTarget};
pub use config::AuthConfig;
pub use import_users::{ImportRow, ImportSummary, ImportUsersUseCase};
pub use log_in::{LogInInput, LogInOutput, LogInUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use token::{Claims, TokenIssuer, TokenKind, TokenPair};
