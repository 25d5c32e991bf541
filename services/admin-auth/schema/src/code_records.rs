use sea_orm::entity::prelude::*;

/// One outstanding admin sign-in challenge. Only the argon2 digest of the
/// code is stored; the plaintext exists solely in the outbox payload until
/// the mail relay delivers it. At most one live (unconsumed, unexpired,
/// under-budget) row exists per principal.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "code_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub principal_id: String,
    pub code_digest: String,
    pub issued_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub attempts_used: i32,
    pub max_attempts: i32,
    pub consumed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
