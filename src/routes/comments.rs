use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, QueryOrder, Set, ActiveModelTrait, ModelTrait};
use serde::Deserialize;

use crate::models::{
    comments::{self, Entity as Comments, Column as CommentColumn},
    topics::{Entity as Topics, Column as TopicColumn},
    dto::CommentResponse,
};
use crate::middleware::AuthUser;
use crate::routes::tutorials::{shape_comments, ReactionRequest};
use crate::services::reaction_service::{ReactionService, ReactionAction};

// DTO pour créer ou modifier un commentaire
#[derive(Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// GET /api/topics/{topic_slug}/comments/ - Commentaires d'un topic (PROTÉGÉE)
#[get("/topics/{topic_slug}/comments/")]
pub async fn list_comments(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let topic_slug = path.into_inner();

    let topic = match Topics::find()
        .filter(TopicColumn::Slug.eq(&topic_slug))
        .one(db.get_ref())
        .await
    {
        Ok(Some(topic)) => topic,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Topic not found"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch topic: {}", e)
            }));
        }
    };

    let comments = match Comments::find()
        .filter(CommentColumn::TopicId.eq(topic.id))
        .all(db.get_ref())
        .await
    {
        Ok(comments) => comments,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch comments: {}", e)
            }));
        }
    };

    match shape_comments(db.get_ref(), comments).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch comments: {}", e)
        })),
    }
}

/// POST /api/topics/{topic_slug}/comments/ - Commenter un topic (PROTÉGÉE)
#[post("/topics/{topic_slug}/comments/")]
pub async fn create_comment(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let topic_slug = path.into_inner();

    // 1. Retrouver le topic
    let topic = match Topics::find()
        .filter(TopicColumn::Slug.eq(&topic_slug))
        .one(db.get_ref())
        .await
    {
        Ok(Some(topic)) => topic,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Topic not found"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch topic: {}", e)
            }));
        }
    };

    // 2. Créer le commentaire au nom du user authentifié
    let now = Utc::now().naive_utc();
    let new_comment = comments::ActiveModel {
        topic_id: Set(topic.id),
        user_id: Set(auth_user.user_id),
        content: Set(body.content.clone()),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
        ..Default::default()
    };

    match new_comment.insert(db.get_ref()).await {
        Ok(comment) => HttpResponse::Created().json(CommentResponse {
            id: comment.id,
            user: auth_user.username,
            content: comment.content,
            total_likes: 0,
            total_dislikes: 0,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create comment: {}", e)
        })),
    }
}

/// PUT /api/comments/{id}/ - Modifier SON commentaire (PROTÉGÉE)
/// Un commentaire d'un autre user renvoie 403, pas une erreur générique
#[put("/comments/{id}/")]
pub async fn update_comment(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<CommentRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let comment_id = path.into_inner();

    let comment = match Comments::find_by_id(comment_id).one(db.get_ref()).await {
        Ok(Some(comment)) => comment,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Comment not found"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch comment: {}", e)
            }));
        }
    };

    if comment.user_id != auth_user.user_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You can only edit your own comments."
        }));
    }

    let mut active: comments::ActiveModel = comment.into();
    active.content = Set(body.content.clone());
    active.updated_at = Set(Some(Utc::now().naive_utc()));

    match active.update(db.get_ref()).await {
        Ok(comment) => HttpResponse::Ok().json(CommentResponse {
            id: comment.id,
            user: auth_user.username,
            content: comment.content,
            total_likes: 0,
            total_dislikes: 0,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update comment: {}", e)
        })),
    }
}

/// DELETE /api/comments/{id}/ - Supprimer SON commentaire (PROTÉGÉE)
#[delete("/comments/{id}/")]
pub async fn delete_comment(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let comment_id = path.into_inner();

    let comment = match Comments::find_by_id(comment_id).one(db.get_ref()).await {
        Ok(Some(comment)) => comment,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Comment not found"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch comment: {}", e)
            }));
        }
    };

    if comment.user_id != auth_user.user_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You can only delete your own comments."
        }));
    }

    match comment.delete(db.get_ref()).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to delete comment: {}", e)
        })),
    }
}

/// POST /api/comments/{id}/reaction/ - Like/dislike un commentaire (PROTÉGÉE)
/// Retourne le commentaire avec ses compteurs mis à jour
#[post("/comments/{id}/reaction/")]
pub async fn comment_reaction(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<ReactionRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let comment_id = path.into_inner();

    // 1. Valider l'action avant de toucher la BD
    let action = match ReactionAction::parse(&body.action) {
        Some(action) => action,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid action"
            }));
        }
    };

    // 2. Retrouver le commentaire
    let comment = match Comments::find_by_id(comment_id).one(db.get_ref()).await {
        Ok(Some(comment)) => comment,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Comment not found"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch comment: {}", e)
            }));
        }
    };

    // 3. Appliquer la réaction (le user quitte l'autre camp si besoin)
    if let Err(e) = ReactionService::react_to_comment(
        db.get_ref(),
        comment.id,
        auth_user.user_id,
        action,
    )
    .await
    {
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to apply reaction: {}", e)
        }));
    }

    // 4. Renvoyer le commentaire avec ses compteurs rechargés
    match shape_comments(db.get_ref(), vec![comment]).await {
        Ok(mut shaped) => HttpResponse::Ok().json(shaped.remove(0)),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch comment: {}", e)
        })),
    }
}

/// GET /api/my-comments/ - Les commentaires du user connecté (PROTÉGÉE)
#[get("/my-comments/")]
pub async fn my_comments(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let comments = match Comments::find()
        .filter(CommentColumn::UserId.eq(auth_user.user_id))
        .order_by_desc(CommentColumn::CreatedAt)
        .all(db.get_ref())
        .await
    {
        Ok(comments) => comments,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch comments: {}", e)
            }));
        }
    };

    match shape_comments(db.get_ref(), comments).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch comments: {}", e)
        })),
    }
}

pub fn comments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_comments)
        .service(create_comment)
        .service(update_comment)
        .service(delete_comment)
        .service(comment_reaction)
        .service(my_comments);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use crate::utils::jwt;

    fn comment_row(id: i32, topic_id: i32, user_id: i32) -> comments::Model {
        comments::Model {
            id,
            topic_id,
            user_id,
            content: "hello".to_string(),
            created_at: Some(Utc::now().naive_utc()),
            updated_at: Some(Utc::now().naive_utc()),
        }
    }

    #[actix_web::test]
    async fn test_update_someone_elses_comment_returns_403() {
        // Le commentaire appartient au user 2, le token est celui du user 1
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![comment_row(5, 10, 2)]])
            .into_connection();

        let access = jwt::generate_access_token(1, "alice").unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(update_comment),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/comments/5/")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .set_json(serde_json::json!({ "content": "edited" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);
    }

    #[actix_web::test]
    async fn test_delete_missing_comment_returns_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<comments::Model, _, _>([vec![]])
            .into_connection();

        let access = jwt::generate_access_token(1, "alice").unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(delete_comment),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri("/comments/99/")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_comment_reaction_invalid_action_returns_400() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let access = jwt::generate_access_token(1, "alice").unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(comment_reaction),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/comments/5/reaction/")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .set_json(serde_json::json!({ "action": "meh" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
