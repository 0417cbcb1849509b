//! Domain logic for the timeline tracker.
//!
//! Nothing in this crate touches the database or the network, so the
//! repository layer, the HTTP handlers, background sweeps and the CLI can
//! all share the same validation rules and calculations.

pub mod analytics;
pub mod dependency;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod gantt;
pub mod milestone;
pub mod notification;
pub mod project;
pub mod roles;
pub mod types;
pub mod user;
