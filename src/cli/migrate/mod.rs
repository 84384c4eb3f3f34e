//! Migrate command - applies or reverts the PostgreSQL schema

use clap::Args;
use tracing::info;

use crate::infrastructure::storage::{run_storage_migrations, PostgresMigrator};

#[derive(Args, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead
    #[arg(long)]
    pub revert: bool,
}

/// Run migrations against the configured database
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let pool = crate::connect_database(&config).await?;

    if args.revert {
        match PostgresMigrator::new(pool).revert_last().await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migrations to revert"),
        }
    } else {
        let applied = run_storage_migrations(&pool).await?;
        info!(applied, "Migrations applied");
    }

    Ok(())
}
