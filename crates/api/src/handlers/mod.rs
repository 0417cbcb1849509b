pub mod admin;
pub mod analytics;
pub mod auth;
pub mod export;
pub mod gantt;
pub mod milestone;
pub mod notification;
pub mod project;
pub mod sharing;
