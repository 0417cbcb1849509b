//! Timeline API server library.
//!
//! Exposes config, state, error handling, routes and background jobs so the
//! server binary, the `timeline-ctl` admin tool and the integration tests
//! share the same building blocks.

pub mod access;
pub mod accounts;
pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
