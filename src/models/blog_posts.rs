use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_posts_rust")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub excerpt: String,

    pub content: String,

    pub featured_image: Option<String>,

    pub category_id: Option<i32>, // SET NULL si la catégorie est supprimée

    pub author_id: i32,

    pub status: String, // "draft" ou "published"

    pub views: i32,

    pub read_time: i32, // Temps de lecture estimé en minutes

    pub published_date: Option<DateTime>,

    pub created_at: Option<DateTime>,

    pub updated_at: Option<DateTime>,

    pub is_featured: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,

    #[sea_orm(has_many = "super::blog_post_tags::Entity")]
    BlogPostTag,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::blog_post_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlogPostTag.def()
    }
}

// Relation many-to-many vers tags via la table de jointure
impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::blog_post_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::blog_post_tags::Relation::BlogPost.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
