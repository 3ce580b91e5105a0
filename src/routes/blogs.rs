use actix_web::{get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder, Set, ActiveModelTrait};
use std::collections::HashMap;

use crate::models::{
    categories::{self, Entity as Categories, Column as CategoryColumn},
    blog_posts::{self, Entity as BlogPosts, Column as BlogPostColumn},
    blog_post_tags::{Entity as BlogPostTags, Column as BlogPostTagColumn},
    tags::{self, Entity as Tags, Column as TagColumn},
    users::{Entity as Users, Column as UserColumn},
    dto::BlogPostResponse,
};

/// GET /api/categories/ - Liste des catégories du blog (PUBLIC)
#[get("/categories/")]
pub async fn list_categories(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let categories = Categories::find()
        .order_by_asc(CategoryColumn::Name)
        .all(db.get_ref())
        .await;

    match categories {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch categories: {}", e)
        })),
    }
}

/// GET /api/blog-posts/ - Articles publiés, du plus récent au plus ancien (PUBLIC)
#[get("/blog-posts/")]
pub async fn list_blog_posts(db: web::Data<DatabaseConnection>) -> HttpResponse {
    // 1. Charger les articles publiés avec leur catégorie
    let posts = BlogPosts::find()
        .filter(BlogPostColumn::Status.eq("published"))
        .order_by_desc(BlogPostColumn::PublishedDate)
        .find_also_related(Categories)
        .all(db.get_ref())
        .await;

    let posts = match posts {
        Ok(posts) => posts,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch blog posts: {}", e)
            }));
        }
    };

    match shape_blog_posts(db.get_ref(), posts).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch blog posts: {}", e)
        })),
    }
}

/// GET /api/blog-posts/{slug}/ - Détail d'un article publié (PUBLIC)
/// Incrémente le compteur de vues à chaque lecture
#[get("/blog-posts/{slug}/")]
pub async fn blog_post_detail(
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let slug = path.into_inner();

    // 1. Retrouver l'article publié
    let result = BlogPosts::find()
        .filter(BlogPostColumn::Slug.eq(&slug))
        .filter(BlogPostColumn::Status.eq("published"))
        .find_also_related(Categories)
        .all(db.get_ref())
        .await;

    let (post, category) = match result {
        Ok(mut rows) => {
            if rows.is_empty() {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "error": "Blog post not found"
                }));
            }
            rows.remove(0)
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch blog post: {}", e)
            }));
        }
    };

    // 2. Incrémenter le compteur de vues
    let views = post.views + 1;
    let mut active: blog_posts::ActiveModel = post.into();
    active.views = Set(views);

    let post = match active.update(db.get_ref()).await {
        Ok(post) => post,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to update views: {}", e)
            }));
        }
    };

    // 3. Construire la réponse complète
    let response = match shape_blog_posts(db.get_ref(), vec![(post, category)]).await {
        Ok(mut shaped) => shaped.remove(0),
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch blog post: {}", e)
            }));
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Blog post retrieved and view count incremented successfully.",
        "data": response
    }))
}

/// Transforme des articles bruts en réponses API:
/// tags et auteurs chargés en un nombre constant de queries
async fn shape_blog_posts(
    db: &DatabaseConnection,
    posts: Vec<(blog_posts::Model, Option<categories::Model>)>,
) -> Result<Vec<BlogPostResponse>, sea_orm::DbErr> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<i32> = posts.iter().map(|(p, _)| p.id).collect();

    // 1. Jointure blog_post_tags pour tous les articles d'un coup
    let links = BlogPostTags::find()
        .filter(BlogPostTagColumn::BlogPostId.is_in(post_ids))
        .all(db)
        .await?;

    let tag_ids: Vec<i32> = links
        .iter()
        .map(|l| l.tag_id)
        .collect::<std::collections::HashSet<_>>()
        .into_iter()
        .collect();

    let tags_map: HashMap<i32, tags::Model> = if tag_ids.is_empty() {
        HashMap::new()
    } else {
        Tags::find()
            .filter(TagColumn::Id.is_in(tag_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect()
    };

    let mut post_tags: HashMap<i32, Vec<tags::Model>> = HashMap::new();
    for link in links {
        if let Some(tag) = tags_map.get(&link.tag_id) {
            post_tags
                .entry(link.blog_post_id)
                .or_default()
                .push(tag.clone());
        }
    }

    // 2. Auteurs en une seule query
    let author_ids: Vec<i32> = posts
        .iter()
        .map(|(p, _)| p.author_id)
        .collect::<std::collections::HashSet<_>>()
        .into_iter()
        .collect();

    let authors_map: HashMap<i32, String> = Users::find()
        .filter(UserColumn::Id.is_in(author_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    // 3. Construire la réponse finale
    let response = posts
        .into_iter()
        .map(|(post, category)| BlogPostResponse {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            content: post.content,
            featured_image: post.featured_image,
            category,
            tags: post_tags.remove(&post.id).unwrap_or_default(),
            author: authors_map.get(&post.author_id).cloned().unwrap_or_default(),
            status: post.status,
            views: post.views,
            read_time: post.read_time,
            published_date: post
                .published_date
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string()),
            created_at: post.created_at,
            updated_at: post.updated_at,
            is_featured: post.is_featured,
        })
        .collect();

    Ok(response)
}

pub fn blogs_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_categories)
        .service(list_blog_posts)
        .service(blog_post_detail);
}
