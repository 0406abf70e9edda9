use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ViewedChannel::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ViewedChannel::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ViewedChannel::UserId).string().not_null())
                    .col(ColumnDef::new(ViewedChannel::ChannelId).string().not_null())
                    .col(
                        ColumnDef::new(ViewedChannel::CreatedAt)
                            .date_time()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup only. Duplicate markers are allowed.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_viewed_channel_user_channel")
                    .table(ViewedChannel::Table)
                    .col(ViewedChannel::UserId)
                    .col(ViewedChannel::ChannelId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ViewedChannel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ViewedChannel {
    Table,
    Id,
    UserId,
    ChannelId,
    CreatedAt,
}
