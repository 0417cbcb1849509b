//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` request DTOs for inserts and patches
//! - Query-specific row structs for joined or aggregated reads

pub mod analytics;
pub mod diagnostics;
pub mod milestone;
pub mod notification;
pub mod project;
pub mod role;
pub mod session;
pub mod user;
