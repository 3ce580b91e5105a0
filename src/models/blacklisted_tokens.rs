// ============================================================================
// MODÈLE : BLACKLISTED TOKENS
// ============================================================================
//
// Description:
//   Modèle de la table blacklisted_tokens_rust correspondant EXACTEMENT
//   à la structure SQL créée par la migration. C'est la deny-list des
//   refresh tokens révoqués.
//
// Colonnes de la table blacklisted_tokens_rust:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - jti (VARCHAR, UNIQUE, NOT NULL) - Identifiant unique du refresh token (UUID v4)
//   - user_id (INTEGER, NOT NULL, FK vers users_rust)
//   - expires_at (TIMESTAMP, NOT NULL) - Expiration du refresh token lui-même
//   - created_at (TIMESTAMP, DEFAULT CURRENT_TIMESTAMP)
//
// Workflow:
//   1. User se déconnecte via POST /api/logout avec son refresh token
//   2. Backend vérifie le refresh token et extrait son jti
//   3. Backend insère le jti dans cette table (erreur si déjà présent)
//   4. Toute tentative de POST /api/token/refresh avec ce jti échoue
//
// Points d'attention:
//   - La contrainte UNIQUE sur jti sérialise les révocations concurrentes
//   - expires_at = expiration du refresh token: une fois ce moment passé le
//     token est refusé de toute façon, la ligne peut donc être purgée
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blacklisted_tokens_rust")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub jti: String,

    pub user_id: i32,

    pub expires_at: DateTime,

    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
