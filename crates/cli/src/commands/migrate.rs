//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! dash-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DASHBOARD_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/dashboard/migrations/` and are embedded into
//! the binary at compile time.

use campaign_dashboard::db::{self, MIGRATOR};

use super::{CommandError, database_url};

/// Run the dashboard database migrations.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to dashboard database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running dashboard migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Dashboard migrations complete");
    Ok(())
}
