use sea_orm::DatabaseConnection;
pub use sea_orm_migration::prelude::*;

use channel_actions_common::error::Result;

mod m20250301_000001_create_channel_action;
mod m20250301_000002_create_viewed_channel;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_channel_action::Migration),
            Box::new(m20250301_000002_create_viewed_channel::Migration),
        ]
    }
}

pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None).await?;
    Ok(())
}
