use actix_web::{get, post, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, Set, ActiveModelTrait};
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{
    tutorials::{Entity as Tutorials, Column as TutorialColumn},
    topics::{self, Entity as Topics, Column as TopicColumn},
    comments::{Entity as Comments, Column as CommentColumn},
    comment_reactions::{Entity as CommentReactions, Column as CommentReactionColumn},
    users::{Entity as Users, Column as UserColumn},
    dto::{TutorialListItem, TutorialDetail, TopicTitle, TopicDetail, CommentResponse},
};
use crate::middleware::AuthUser;
use crate::services::reaction_service::{ReactionService, ReactionAction};

// DTO pour une réaction like/dislike
#[derive(Deserialize)]
pub struct ReactionRequest {
    pub action: String,
}

/// GET /api/tutorials/ - Liste des tutoriels avec leurs topics (PROTÉGÉE)
#[get("/tutorials/")]
pub async fn list_tutorials(
    _auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let tutorials_with_topics = Tutorials::find()
        .find_with_related(Topics)
        .all(db.get_ref())
        .await;

    match tutorials_with_topics {
        Ok(tutorials_with_topics) => {
            let response: Vec<TutorialListItem> = tutorials_with_topics
                .into_iter()
                .map(|(tutorial, topics)| {
                    let topics: Vec<TopicTitle> = topics
                        .into_iter()
                        .map(|t| TopicTitle {
                            id: t.id,
                            title: t.title,
                            slug: t.slug,
                        })
                        .collect();

                    TutorialListItem {
                        id: tutorial.id,
                        title: tutorial.title,
                        description: tutorial.description,
                        thumbnail: tutorial.thumbnail,
                        total_topics: topics.len(),
                        topics,
                    }
                })
                .collect();

            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch tutorials: {}", e)
        })),
    }
}

/// GET /api/tutorials/{slug}/ - Détail d'un tutoriel (PROTÉGÉE)
#[get("/tutorials/{slug}/")]
pub async fn tutorial_detail(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let slug = path.into_inner();

    let result = Tutorials::find()
        .filter(TutorialColumn::Slug.eq(&slug))
        .find_with_related(Topics)
        .all(db.get_ref())
        .await;

    match result {
        Ok(mut rows) => {
            if rows.is_empty() {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "error": "Tutorial not found"
                }));
            }

            let (tutorial, topics) = rows.remove(0);
            let topics: Vec<TopicTitle> = topics
                .into_iter()
                .map(|t| TopicTitle {
                    id: t.id,
                    title: t.title,
                    slug: t.slug,
                })
                .collect();

            HttpResponse::Ok().json(TutorialDetail {
                id: tutorial.id,
                title: tutorial.title,
                description: tutorial.description,
                thumbnail: tutorial.thumbnail,
                created_at: tutorial.created_at,
                updated_at: tutorial.updated_at,
                total_topics: topics.len(),
                topics,
            })
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch tutorial: {}", e)
        })),
    }
}

/// GET /api/tutorials/{tutorial_slug}/topics/ - Topics d'un tutoriel (PROTÉGÉE)
#[get("/tutorials/{tutorial_slug}/topics/")]
pub async fn list_topics(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let tutorial_slug = path.into_inner();

    // 1. Retrouver le tutoriel par slug
    let tutorial = match Tutorials::find()
        .filter(TutorialColumn::Slug.eq(&tutorial_slug))
        .one(db.get_ref())
        .await
    {
        Ok(Some(tutorial)) => tutorial,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Tutorial not found"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch tutorial: {}", e)
            }));
        }
    };

    // 2. Lister ses topics (id + titre + slug seulement)
    let topics = Topics::find()
        .filter(TopicColumn::TutorialId.eq(tutorial.id))
        .all(db.get_ref())
        .await;

    match topics {
        Ok(topics) => {
            let response: Vec<TopicTitle> = topics
                .into_iter()
                .map(|t| TopicTitle {
                    id: t.id,
                    title: t.title,
                    slug: t.slug,
                })
                .collect();

            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to fetch topics: {}", e)
        })),
    }
}

/// GET /api/topics/{slug}/ - Détail d'un topic (PROTÉGÉE)
/// Incrémente le compteur de vues et embarque commentaires + réactions
#[get("/topics/{slug}/")]
pub async fn topic_detail(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let slug = path.into_inner();

    // 1. Retrouver le topic
    let topic = match Topics::find()
        .filter(TopicColumn::Slug.eq(&slug))
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

    // 2. Incrémenter le compteur de vues
    let views = topic.views + 1;
    let mut active: topics::ActiveModel = topic.into();
    active.views = Set(views);

    let topic = match active.update(db.get_ref()).await {
        Ok(topic) => topic,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to update views: {}", e)
            }));
        }
    };

    // 3. Charger les commentaires du topic
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

    let comments = match shape_comments(db.get_ref(), comments).await {
        Ok(comments) => comments,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch comments: {}", e)
            }));
        }
    };

    // 4. Compteurs de réactions du topic
    let reactions = match ReactionService::topic_reaction_counts(db.get_ref(), topic.id).await {
        Ok(counts) => counts,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch reactions: {}", e)
            }));
        }
    };

    HttpResponse::Ok().json(TopicDetail {
        id: topic.id,
        tutorial: topic.tutorial_id,
        title: topic.title,
        content: topic.content,
        video_url: topic.video_url,
        views: topic.views,
        created_at: topic.created_at,
        updated_at: topic.updated_at,
        comments,
        reactions,
    })
}

/// POST /api/topics/{slug}/reaction/ - Like/dislike un topic (PROTÉGÉE)
/// Retourne les compteurs mis à jour {likes, dislikes}
#[post("/topics/{slug}/reaction/")]
pub async fn topic_reaction(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<ReactionRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let slug = path.into_inner();

    // 1. Valider l'action AVANT de toucher la BD: aucune ligne ne doit être
    // créée pour une action inconnue
    let action = match ReactionAction::parse(&body.action) {
        Some(action) => action,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid action"
            }));
        }
    };

    // 2. Retrouver le topic
    let topic = match Topics::find()
        .filter(TopicColumn::Slug.eq(&slug))
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

    // 3. Appliquer la réaction et renvoyer les compteurs
    match ReactionService::react_to_topic(db.get_ref(), topic.id, auth_user.user_id, action).await {
        Ok(counts) => HttpResponse::Ok().json(counts),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to apply reaction: {}", e)
        })),
    }
}

/// Transforme des commentaires bruts en réponses API:
/// usernames et compteurs de réactions chargés en UNE query chacun
pub async fn shape_comments(
    db: &DatabaseConnection,
    comments: Vec<crate::models::comments::Model>,
) -> Result<Vec<CommentResponse>, sea_orm::DbErr> {
    if comments.is_empty() {
        return Ok(Vec::new());
    }

    // 1. Charger les auteurs en une seule query
    let user_ids: Vec<i32> = comments
        .iter()
        .map(|c| c.user_id)
        .collect::<std::collections::HashSet<_>>()
        .into_iter()
        .collect();

    let users_map: HashMap<i32, String> = Users::find()
        .filter(UserColumn::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    // 2. Charger toutes les réactions de ces commentaires en une query
    let comment_ids: Vec<i32> = comments.iter().map(|c| c.id).collect();

    let reactions = CommentReactions::find()
        .filter(CommentReactionColumn::CommentId.is_in(comment_ids))
        .all(db)
        .await?;

    let mut likes_map: HashMap<i32, u64> = HashMap::new();
    let mut dislikes_map: HashMap<i32, u64> = HashMap::new();
    for reaction in reactions {
        if reaction.is_like {
            *likes_map.entry(reaction.comment_id).or_insert(0) += 1;
        } else {
            *dislikes_map.entry(reaction.comment_id).or_insert(0) += 1;
        }
    }

    // 3. Construire la réponse finale
    let response = comments
        .into_iter()
        .map(|c| CommentResponse {
            id: c.id,
            user: users_map.get(&c.user_id).cloned().unwrap_or_default(),
            content: c.content,
            total_likes: likes_map.get(&c.id).copied().unwrap_or(0),
            total_dislikes: dislikes_map.get(&c.id).copied().unwrap_or(0),
            created_at: c.created_at,
            updated_at: c.updated_at,
        })
        .collect();

    Ok(response)
}

pub fn tutorials_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_tutorials)
        .service(tutorial_detail)
        .service(list_topics)
        .service(topic_detail)
        .service(topic_reaction);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use crate::utils::jwt;

    #[actix_web::test]
    async fn test_topic_reaction_invalid_action_returns_400_without_touching_db() {
        // Mock sans aucun résultat: si le handler touchait la BD, le test
        // échouerait sur un résultat manquant
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let access = jwt::generate_access_token(1, "alice").unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(topic_reaction),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/topics/abc/reaction/")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .set_json(serde_json::json!({ "action": "love" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_topic_reaction_requires_authentication() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(topic_reaction),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/topics/abc/reaction/")
            .set_json(serde_json::json!({ "action": "like" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
