use sea_orm::entity::prelude::*;

/// Self-registered account for the self-issued token scheme. Independent of
/// the delegated-SSO identities, which never touch this table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "api_users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    /// argon2id hash, never the plaintext.
    pub password: String,
    /// 0 = VISITOR, 1 = USER, 2 = ADMIN.
    pub role: i16,
    pub enabled: bool,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
