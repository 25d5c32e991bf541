use sea_orm_migration::prelude::*;

mod m20260801_000001_create_code_records;
mod m20260801_000002_create_audit_entries;
mod m20260801_000003_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_code_records::Migration),
            Box::new(m20260801_000002_create_audit_entries::Migration),
            Box::new(m20260801_000003_create_outbox_events::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
