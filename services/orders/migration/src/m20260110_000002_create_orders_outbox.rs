use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrdersOutbox::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrdersOutbox::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrdersOutbox::AggType).string().not_null())
                    .col(ColumnDef::new(OrdersOutbox::AggId).uuid().not_null())
                    .col(ColumnDef::new(OrdersOutbox::Topic).string().not_null())
                    .col(ColumnDef::new(OrdersOutbox::Key).binary().not_null())
                    .col(
                        ColumnDef::new(OrdersOutbox::Headers)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrdersOutbox::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrdersOutbox::Retries)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(OrdersOutbox::AvailableAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(OrdersOutbox::PublishedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(OrdersOutbox::Error).text())
                    .col(
                        ColumnDef::new(OrdersOutbox::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the relay poll query (unpublished rows in id order).
        manager
            .create_index(
                Index::create()
                    .table(OrdersOutbox::Table)
                    .col(OrdersOutbox::PublishedAt)
                    .name("idx_orders_outbox_published_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrdersOutbox::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OrdersOutbox {
    Table,
    Id,
    AggType,
    AggId,
    Topic,
    Key,
    Headers,
    Payload,
    Retries,
    AvailableAt,
    PublishedAt,
    Error,
    CreatedAt,
}
