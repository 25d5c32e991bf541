use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use uuid::Uuid;

use subplaza_admin_auth_schema::audit_entries;

use crate::domain::repository::AuditSink;
use crate::domain::types::AuditEntry;

/// Appends audit rows from a spawned task. The auth path never waits on the
/// insert and never sees its failure — a lost entry is a warning, not a
/// request error.
#[derive(Clone)]
pub struct DbAuditSink {
    pub db: DatabaseConnection,
}

impl AuditSink for DbAuditSink {
    fn record(&self, entry: AuditEntry) {
        let db = self.db.clone();
        tokio::spawn(async move {
            let model = audit_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                action: Set(entry.action.as_str().to_owned()),
                outcome: Set(entry.outcome.as_str().to_owned()),
                principal_id: Set(entry.principal_id),
                client_key: Set(entry.client_key),
                client_agent: Set(entry.client_agent),
                detail: Set(entry.detail),
                created_at: Set(Utc::now()),
            };
            if let Err(e) = model.insert(&db).await {
                tracing::warn!(error = %e, "audit append failed");
            }
        });
    }
}
