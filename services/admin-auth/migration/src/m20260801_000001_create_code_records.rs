use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CodeRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CodeRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CodeRecords::PrincipalId).string().not_null())
                    .col(ColumnDef::new(CodeRecords::CodeDigest).string().not_null())
                    .col(
                        ColumnDef::new(CodeRecords::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CodeRecords::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CodeRecords::AttemptsUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CodeRecords::MaxAttempts).integer().not_null())
                    .col(
                        ColumnDef::new(CodeRecords::Consumed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Live-record lookup filters on (principal_id, consumed, expires_at);
        // consumed rows accumulate since expiry is lazy.
        manager
            .create_index(
                Index::create()
                    .table(CodeRecords::Table)
                    .col(CodeRecords::PrincipalId)
                    .col(CodeRecords::Consumed)
                    .name("idx_code_records_principal_consumed")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CodeRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CodeRecords {
    Table,
    Id,
    PrincipalId,
    CodeDigest,
    IssuedAt,
    ExpiresAt,
    AttemptsUsed,
    MaxAttempts,
    Consumed,
}
