use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "topics_rust")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub tutorial_id: i32,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub content: String,

    pub video_url: Option<String>,

    pub views: i32, // Incrémenté à chaque GET du détail

    pub created_at: Option<DateTime>,

    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tutorials::Entity",
        from = "Column::TutorialId",
        to = "super::tutorials::Column::Id"
    )]
    Tutorial,

    #[sea_orm(has_many = "super::comments::Entity")]
    Comment,

    #[sea_orm(has_many = "super::topic_reactions::Entity")]
    TopicReaction,
}

impl Related<super::tutorials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tutorial.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::topic_reactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TopicReaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
