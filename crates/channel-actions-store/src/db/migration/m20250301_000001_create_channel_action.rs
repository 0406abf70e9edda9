use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChannelAction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChannelAction::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChannelAction::ChannelId).string().not_null())
                    .col(ColumnDef::new(ChannelAction::Enabled).boolean().not_null())
                    .col(
                        ColumnDef::new(ChannelAction::DeleteAt)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ChannelAction::ActionType).string().not_null())
                    .col(ColumnDef::new(ChannelAction::TriggerType).string().not_null())
                    .col(ColumnDef::new(ChannelAction::Payload).text().not_null())
                    .col(
                        ColumnDef::new(ChannelAction::CreatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChannelAction::UpdatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_channel_action_channel_id")
                    .table(ChannelAction::Table)
                    .col(ChannelAction::ChannelId)
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TRIGGER channel_action_updated_at
            AFTER UPDATE ON channel_action
            FOR EACH ROW
            BEGIN
                UPDATE channel_action
                SET updated_at = (datetime('now','localtime'))
                WHERE id = NEW.id;
            END;",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChannelAction::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ChannelAction {
    Table,
    Id,
    ChannelId,
    Enabled,
    DeleteAt,
    ActionType,
    TriggerType,
    Payload,
    CreatedAt,
    UpdatedAt,
}
