use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use subplaza_admin_auth_schema::{code_records, outbox_events};

use crate::domain::repository::CodeRecordStore;
use crate::domain::types::{CodeRecord, OutboxEvent};
use crate::error::AdminAuthError;

#[derive(Clone)]
pub struct DbCodeRecordStore {
    pub db: DatabaseConnection,
}

impl CodeRecordStore for DbCodeRecordStore {
    async fn issue(&self, record: &CodeRecord, event: &OutboxEvent) -> Result<(), AdminAuthError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let record = record.clone();
                let event = event.clone();
                Box::pin(async move {
                    retire_live_records(txn, &record.principal_id).await?;
                    insert_code_record(txn, &record).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("issue code record with outbox")?;
        Ok(())
    }

    async fn load_live(&self, principal_id: &str) -> Result<Option<CodeRecord>, AdminAuthError> {
        let now = Utc::now();
        let model = code_records::Entity::find()
            .filter(code_records::Column::PrincipalId.eq(principal_id))
            .filter(code_records::Column::Consumed.eq(false))
            .filter(code_records::Column::ExpiresAt.gt(now))
            .order_by_desc(code_records::Column::IssuedAt)
            .one(&self.db)
            .await
            .context("load live code record")?;
        Ok(model.map(record_from_model))
    }

    async fn record_failed_attempt(&self, id: Uuid) -> Result<(i32, i32), AdminAuthError> {
        // Single UPDATE: the increment and the reaching-the-budget
        // invalidation happen in one statement, so no concurrent verify can
        // slip between them. `consumed` is OR-ed with its current value —
        // a racing successful consume is never undone.
        let exhausted = Expr::col(code_records::Column::AttemptsUsed)
            .add(1)
            .gte(Expr::col(code_records::Column::MaxAttempts));
        let updated = code_records::Entity::update_many()
            .col_expr(
                code_records::Column::AttemptsUsed,
                Expr::col(code_records::Column::AttemptsUsed).add(1),
            )
            .col_expr(
                code_records::Column::Consumed,
                Expr::col(code_records::Column::Consumed).or(exhausted),
            )
            .filter(code_records::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .context("record failed attempt")?;

        match updated.into_iter().next() {
            Some(model) => Ok((model.attempts_used, model.max_attempts)),
            // The row vanished under us; report the same terminal failure a
            // spent code gets.
            None => Err(AdminAuthError::InvalidOrExpired),
        }
    }

    async fn consume(&self, id: Uuid) -> Result<bool, AdminAuthError> {
        let result = code_records::Entity::update_many()
            .col_expr(code_records::Column::Consumed, Expr::value(true))
            .filter(code_records::Column::Id.eq(id))
            .filter(code_records::Column::Consumed.eq(false))
            .exec(&self.db)
            .await
            .context("consume code record")?;
        Ok(result.rows_affected == 1)
    }
}

async fn retire_live_records(
    txn: &DatabaseTransaction,
    principal_id: &str,
) -> Result<(), sea_orm::DbErr> {
    code_records::Entity::update_many()
        .col_expr(code_records::Column::Consumed, Expr::value(true))
        .filter(code_records::Column::PrincipalId.eq(principal_id))
        .filter(code_records::Column::Consumed.eq(false))
        .exec(txn)
        .await?;
    Ok(())
}

async fn insert_code_record(
    txn: &DatabaseTransaction,
    record: &CodeRecord,
) -> Result<(), sea_orm::DbErr> {
    code_records::ActiveModel {
        id: Set(record.id),
        principal_id: Set(record.principal_id.clone()),
        code_digest: Set(record.code_digest.clone()),
        issued_at: Set(record.issued_at),
        expires_at: Set(record.expires_at),
        attempts_used: Set(record.attempts_used),
        max_attempts: Set(record.max_attempts),
        consumed: Set(record.consumed),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn record_from_model(model: code_records::Model) -> CodeRecord {
    CodeRecord {
        id: model.id,
        principal_id: model.principal_id,
        code_digest: model.code_digest,
        issued_at: model.issued_at,
        expires_at: model.expires_at,
        attempts_used: model.attempts_used,
        max_attempts: model.max_attempts,
        consumed: model.consumed,
    }
}
