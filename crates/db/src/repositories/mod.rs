//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&SqlitePool` as the first argument.

pub mod analytics_repo;
pub mod collaborator_repo;
pub mod diagnostic_repo;
pub mod milestone_repo;
pub mod notification_repo;
pub mod project_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use collaborator_repo::CollaboratorRepo;
pub use diagnostic_repo::DiagnosticRepo;
pub use milestone_repo::MilestoneRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
