// ============================================================================
// MODÈLE : COMMENT REACTIONS
// ============================================================================
//
// Description:
//   Modèle de la table comment_reactions_rust correspondant EXACTEMENT
//   à la structure SQL créée par la migration. Une ligne = la réaction
//   d'un user sur un commentaire (like OU dislike, jamais les deux).
//
// Colonnes de la table comment_reactions_rust:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - comment_id (INTEGER, NOT NULL, FK vers comments_rust)
//   - user_id (INTEGER, NOT NULL, FK vers users_rust)
//   - is_like (BOOLEAN, NOT NULL) - true = like, false = dislike
//
// Points d'attention:
//   - Contrainte UNIQUE sur (comment_id, user_id): au plus une réaction
//     par user et par commentaire, changer d'avis modifie la ligne
//   - "Pas de réaction" = absence de ligne
//   - ON DELETE CASCADE depuis comments_rust et users_rust
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment_reactions_rust")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub comment_id: i32,

    pub user_id: i32,

    pub is_like: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::comments::Entity",
        from = "Column::CommentId",
        to = "super::comments::Column::Id"
    )]
    Comment,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
