//! Timeline event bus and notification delivery.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`TimelineEvent`]: the domain event envelope.
//! - [`delivery`]: outbound email delivery.
//! - [`EmailNotifier`]: mails `project.shared` and `milestone.due` events to
//!   their recipients.
//! - [`MilestoneDueSweep`]: periodic reminder for milestones that are due soon.

pub mod bus;
pub mod delivery;
pub mod due_sweep;
pub mod notifier;

pub use bus::{EventBus, TimelineEvent};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use due_sweep::{MilestoneDueSweep, SweepReport};
pub use notifier::EmailNotifier;
