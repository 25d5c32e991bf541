use sea_orm::entity::prelude::*;

/// Append-only audit trail of authentication activity. Rows are written for
/// every terminal outcome (success, failure, rate-limited) and never mutated
/// or deleted by this service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub action: String,
    pub outcome: String,
    pub principal_id: Option<String>,
    pub client_key: String,
    pub client_agent: Option<String>,
    /// Non-sensitive context only, e.g. a masked code tail.
    pub detail: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
