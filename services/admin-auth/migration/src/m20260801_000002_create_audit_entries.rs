use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditEntries::Action).string().not_null())
                    .col(ColumnDef::new(AuditEntries::Outcome).string().not_null())
                    .col(ColumnDef::new(AuditEntries::PrincipalId).string())
                    .col(ColumnDef::new(AuditEntries::ClientKey).string().not_null())
                    .col(ColumnDef::new(AuditEntries::ClientAgent).string())
                    .col(ColumnDef::new(AuditEntries::Detail).string())
                    .col(
                        ColumnDef::new(AuditEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AuditEntries::Table)
                    .col(AuditEntries::CreatedAt)
                    .name("idx_audit_entries_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuditEntries {
    Table,
    Id,
    Action,
    Outcome,
    PrincipalId,
    ClientKey,
    ClientAgent,
    Detail,
    CreatedAt,
}
