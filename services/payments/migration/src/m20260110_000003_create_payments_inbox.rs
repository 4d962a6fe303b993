use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentsInbox::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentsInbox::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentsInbox::Topic).string().not_null())
                    .col(
                        ColumnDef::new(PaymentsInbox::Partition)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentsInbox::Offset)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentsInbox::Key).binary().not_null())
                    .col(
                        ColumnDef::new(PaymentsInbox::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentsInbox::ReceivedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PaymentsInbox::ProcessedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PaymentsInbox::Table)
                    .col(PaymentsInbox::Topic)
                    .col(PaymentsInbox::Partition)
                    .col(PaymentsInbox::Offset)
                    .unique()
                    .name("uq_payments_inbox_topic_partition_offset")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentsInbox::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PaymentsInbox {
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
