use sea_orm_migration::prelude::*;

mod m20260110_000001_create_orders;
mod m20260110_000002_create_orders_outbox;
mod m20260110_000003_create_orders_inbox;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_create_orders::Migration),
            Box::new(m20260110_000002_create_orders_outbox::Migration),
            Box::new(m20260110_000003_create_orders_inbox::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
