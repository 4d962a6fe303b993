use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrdersInbox::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrdersInbox::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrdersInbox::Topic).string().not_null())
                    .col(ColumnDef::new(OrdersInbox::Partition).integer().not_null())
                    .col(
                        ColumnDef::new(OrdersInbox::Offset)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrdersInbox::Key).binary().not_null())
                    .col(
                        ColumnDef::new(OrdersInbox::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrdersInbox::ReceivedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(OrdersInbox::ProcessedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Dedup constraint: at most one row per bus coordinate.
        manager
            .create_index(
                Index::create()
                    .table(OrdersInbox::Table)
                    .col(OrdersInbox::Topic)
                    .col(OrdersInbox::Partition)
                    .col(OrdersInbox::Offset)
                    .unique()
                    .name("uq_orders_inbox_topic_partition_offset")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrdersInbox::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OrdersInbox {
    Table,
    Id,
    Topic,
    Partition,
    Offset,
    Key,
    Payload,
    ReceivedAt,
    ProcessedAt,
}
