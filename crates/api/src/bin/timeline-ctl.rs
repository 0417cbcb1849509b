//! Administrative command-line tool.
//!
//! Shares the server's database, migrations and validation rules.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use timeline_api::accounts::{create_account, NewAccount};
use timeline_api::config::{env_or, DEFAULT_MIN_PASSWORD_LENGTH};
use timeline_core::notification::DEFAULT_DUE_WINDOW_DAYS;
use timeline_core::roles::{ADMIN_ROLE_ID, DEFAULT_ROLE_ID};
use timeline_db::repositories::DiagnosticRepo;
use timeline_events::{EventBus, MilestoneDueSweep};

const DEFAULT_DATABASE_URL: &str = "sqlite://timeline.db";

/// Timeline administration
#[derive(Parser)]
#[command(name = "timeline-ctl")]
#[command(version)]
#[command(about = "Administrative tasks for the timeline server", long_about = None)]
struct Cli {
    /// Database URL (falls back to `DATABASE_URL`, then `sqlite://timeline.db`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },

    /// Create reminders for milestones that are due soon
    CheckMilestones {
        /// Reminder window in days
        #[arg(long, default_value_t = DEFAULT_DUE_WINDOW_DAYS)]
        window_days: i64,
    },

    /// Report data integrity issues
    CheckDatabase,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    timeline_api::logging::init("timeline_ctl=info,timeline_events=info,warn");

    let cli = Cli::parse();

    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let pool = timeline_db::create_pool(&database_url)
        .await
        .with_context(|| format!("connecting to {database_url}"))?;
    timeline_db::run_migrations(&pool)
        .await
        .context("applying migrations")?;

    match cli.command {
        Commands::CreateUser {
            username,
            email,
            password,
            admin,
        } => {
            let min_password_length = env_or("MIN_PASSWORD_LENGTH", DEFAULT_MIN_PASSWORD_LENGTH);
            let role_id = if admin { ADMIN_ROLE_ID } else { DEFAULT_ROLE_ID };

            let user = create_account(
                &pool,
                &NewAccount {
                    username: &username,
                    email: &email,
                    password: &password,
                    role_id,
                },
                min_password_length,
            )
            .await
            .map_err(|e| anyhow::anyhow!("{e}"))?;

            println!(
                "Created {} '{}' (id {})",
                if admin { "admin" } else { "user" },
                user.username,
                user.id
            );
        }

        Commands::CheckMilestones { window_days } => {
            let sweep = MilestoneDueSweep::new(pool, Arc::new(EventBus::default()), window_days);
            let report = sweep
                .run_once(Utc::now().date_naive())
                .await
                .context("running milestone sweep")?;

            println!(
                "Checked {} milestone(s): {} notification(s) created, {} already pending",
                report.milestones_checked, report.notifications_created, report.skipped_existing
            );
        }

        Commands::CheckDatabase => {
            let report = DiagnosticRepo::run(&pool)
                .await
                .context("running diagnostics")?;

            println!("Users: {}", report.total_users);
            println!("Projects: {}", report.total_projects);
            println!("Milestones: {}", report.total_milestones);

            if report.is_healthy() {
                println!("No issues found");
            } else {
                println!("{} issue(s):", report.issues.len());
                for issue in &report.issues {
                    println!("  - {}", issue.message);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
