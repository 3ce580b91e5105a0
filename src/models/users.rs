// ============================================================================
// MODÈLE : USERS
// ============================================================================
//
// Description:
//   Modèle de la table users_rust correspondant EXACTEMENT à la structure
//   SQL créée par la migration.
//
// Colonnes de la table users_rust:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - username (VARCHAR, UNIQUE, NOT NULL)
//   - email (VARCHAR, UNIQUE, NOT NULL)
//   - password_hash (VARCHAR, NOT NULL) - Format: pbkdf2:sha256:iterations$salt$hash
//   - last_login (TIMESTAMP, NULL) - Mis à jour à chaque login réussi
//   - date_joined (TIMESTAMP, DEFAULT CURRENT_TIMESTAMP)
//
// Points d'attention:
//   - password_hash garde le format Werkzeug pour rester compatible avec
//     les comptes créés par le backend Python
//   - last_login entre dans le calcul du token de reset password: un login
//     réussi invalide tous les tokens de reset en circulation
//   - La table a le suffixe "_rust" pour coexister avec Python
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users_rust")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)] // Ne jamais exposer le hash en JSON
    pub password_hash: String,

    pub last_login: Option<DateTime>,

    pub date_joined: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comments::Entity")]
    Comment,

    #[sea_orm(has_many = "super::comment_reactions::Entity")]
    CommentReaction,

    #[sea_orm(has_many = "super::topic_reactions::Entity")]
    TopicReaction,

    #[sea_orm(has_many = "super::blog_posts::Entity")]
    BlogPost,

    #[sea_orm(has_many = "super::blacklisted_tokens::Entity")]
    BlacklistedToken,
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::comment_reactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommentReaction.def()
    }
}

impl Related<super::topic_reactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TopicReaction.def()
    }
}

impl Related<super::blog_posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlogPost.def()
    }
}

impl Related<super::blacklisted_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlacklistedToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
