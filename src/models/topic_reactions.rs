// ============================================================================
// MODÈLE : TOPIC REACTIONS
// ============================================================================
//
// Description:
//   Modèle de la table topic_reactions_rust correspondant EXACTEMENT
//   à la structure SQL créée par la migration. Même représentation que
//   comment_reactions_rust: une ligne unique par (topic, user).
//
// Colonnes de la table topic_reactions_rust:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - topic_id (INTEGER, NOT NULL, FK vers topics_rust)
//   - user_id (INTEGER, NOT NULL, FK vers users_rust)
//   - is_like (BOOLEAN, NOT NULL) - true = like, false = dislike
//
// Points d'attention:
//   - Contrainte UNIQUE sur (topic_id, user_id): deux requêtes concurrentes
//     du même user ne peuvent pas créer deux lignes, le perdant du INSERT
//     est rejoué en UPDATE
//   - likes = count(is_like = true), dislikes = count(is_like = false)
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "topic_reactions_rust")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub topic_id: i32,

    pub user_id: i32,

    pub is_like: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::topics::Entity",
        from = "Column::TopicId",
        to = "super::topics::Column::Id"
    )]
    Topic,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::topics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topic.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
