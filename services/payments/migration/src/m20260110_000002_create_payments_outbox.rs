use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentsOutbox::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentsOutbox::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentsOutbox::AggType).string().not_null())
                    .col(ColumnDef::new(PaymentsOutbox::AggId).uuid().not_null())
                    .col(ColumnDef::new(PaymentsOutbox::Topic).string().not_null())
                    .col(ColumnDef::new(PaymentsOutbox::Key).binary().not_null())
                    .col(
                        ColumnDef::new(PaymentsOutbox::Headers)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentsOutbox::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentsOutbox::Retries)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PaymentsOutbox::AvailableAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PaymentsOutbox::PublishedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PaymentsOutbox::Error).text())
                    .col(
                        ColumnDef::new(PaymentsOutbox::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PaymentsOutbox::Table)
                    .col(PaymentsOutbox::PublishedAt)
                    .name("idx_payments_outbox_published_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentsOutbox::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PaymentsOutbox {
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
