use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags_rust")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::blog_post_tags::Entity")]
    BlogPostTag,
}

impl Related<super::blog_post_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlogPostTag.def()
    }
}

// Relation many-to-many vers blog_posts via la table de jointure
impl Related<super::blog_posts::Entity> for Entity {
    fn to() -> RelationDef {
        super::blog_post_tags::Relation::BlogPost.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::blog_post_tags::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
