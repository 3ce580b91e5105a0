use sea_orm::*;
use crate::models::{comment_reactions, topic_reactions};
use crate::models::dto::ReactionCounts;

pub struct ReactionService;

/// Action de réaction envoyée par le client
/// Tout autre valeur que "like"/"dislike" est rejetée AVANT de toucher la BD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionAction {
    Like,
    Dislike,
}

impl ReactionAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "like" => Some(ReactionAction::Like),
            "dislike" => Some(ReactionAction::Dislike),
            _ => None,
        }
    }

    pub fn is_like(self) -> bool {
        matches!(self, ReactionAction::Like)
    }
}

impl ReactionService {
    /// Applique une réaction sur un commentaire (ligne unique par user)
    /// Rejouer la même action est un no-op, changer d'avis modifie la ligne
    pub async fn react_to_comment(
        db: &DatabaseConnection,
        comment_id: i32,
        user_id: i32,
        action: ReactionAction,
    ) -> Result<ReactionCounts, DbErr> {
        // 1. Chercher la réaction existante du user sur ce commentaire
        let existing = comment_reactions::Entity::find()
            .filter(comment_reactions::Column::CommentId.eq(comment_id))
            .filter(comment_reactions::Column::UserId.eq(user_id))
            .one(db)
            .await?;

        match existing {
            Some(reaction) => {
                // 2a. Ligne déjà là: ne réécrire que si l'avis change
                if reaction.is_like != action.is_like() {
                    let mut active: comment_reactions::ActiveModel = reaction.into();
                    active.is_like = Set(action.is_like());
                    active.update(db).await?;
                }
            }
            None => {
                // 2b. Pas encore de réaction: créer la ligne
                let new_reaction = comment_reactions::ActiveModel {
                    comment_id: Set(comment_id),
                    user_id: Set(user_id),
                    is_like: Set(action.is_like()),
                    ..Default::default()
                };

                if let Err(insert_err) = new_reaction.insert(db).await {
                    // Deux requêtes concurrentes du même user: la contrainte
                    // UNIQUE a fait perdre ce INSERT, la ligne existe
                    // maintenant, on rejoue en UPDATE
                    let reaction = comment_reactions::Entity::find()
                        .filter(comment_reactions::Column::CommentId.eq(comment_id))
                        .filter(comment_reactions::Column::UserId.eq(user_id))
                        .one(db)
                        .await?
                        .ok_or(insert_err)?;

                    let mut active: comment_reactions::ActiveModel = reaction.into();
                    active.is_like = Set(action.is_like());
                    active.update(db).await?;
                }
            }
        }

        // 3. Recalculer les compteurs
        Self::comment_reaction_counts(db, comment_id).await
    }

    /// Applique une réaction sur un topic, même logique que les commentaires
    pub async fn react_to_topic(
        db: &DatabaseConnection,
        topic_id: i32,
        user_id: i32,
        action: ReactionAction,
    ) -> Result<ReactionCounts, DbErr> {
        let existing = topic_reactions::Entity::find()
            .filter(topic_reactions::Column::TopicId.eq(topic_id))
            .filter(topic_reactions::Column::UserId.eq(user_id))
            .one(db)
            .await?;

        match existing {
            Some(reaction) => {
                if reaction.is_like != action.is_like() {
                    let mut active: topic_reactions::ActiveModel = reaction.into();
                    active.is_like = Set(action.is_like());
                    active.update(db).await?;
                }
            }
            None => {
                let new_reaction = topic_reactions::ActiveModel {
                    topic_id: Set(topic_id),
                    user_id: Set(user_id),
                    is_like: Set(action.is_like()),
                    ..Default::default()
                };

                if let Err(insert_err) = new_reaction.insert(db).await {
                    let reaction = topic_reactions::Entity::find()
                        .filter(topic_reactions::Column::TopicId.eq(topic_id))
                        .filter(topic_reactions::Column::UserId.eq(user_id))
                        .one(db)
                        .await?
                        .ok_or(insert_err)?;

                    let mut active: topic_reactions::ActiveModel = reaction.into();
                    active.is_like = Set(action.is_like());
                    active.update(db).await?;
                }
            }
        }

        Self::topic_reaction_counts(db, topic_id).await
    }

    /// Compteurs likes/dislikes d'un commentaire
    /// likes + dislikes = nombre de users ayant réagi (une ligne par user)
    pub async fn comment_reaction_counts(
        db: &DatabaseConnection,
        comment_id: i32,
    ) -> Result<ReactionCounts, DbErr> {
        let reactions = comment_reactions::Entity::find()
            .filter(comment_reactions::Column::CommentId.eq(comment_id))
            .all(db)
            .await?;

        let likes = reactions.iter().filter(|r| r.is_like).count() as u64;
        let dislikes = reactions.len() as u64 - likes;

        Ok(ReactionCounts { likes, dislikes })
    }

    /// Compteurs likes/dislikes d'un topic
    pub async fn topic_reaction_counts(
        db: &DatabaseConnection,
        topic_id: i32,
    ) -> Result<ReactionCounts, DbErr> {
        let reactions = topic_reactions::Entity::find()
            .filter(topic_reactions::Column::TopicId.eq(topic_id))
            .all(db)
            .await?;

        let likes = reactions.iter().filter(|r| r.is_like).count() as u64;
        let dislikes = reactions.len() as u64 - likes;

        Ok(ReactionCounts { likes, dislikes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn topic_row(id: i32, topic_id: i32, user_id: i32, is_like: bool) -> topic_reactions::Model {
        topic_reactions::Model {
            id,
            topic_id,
            user_id,
            is_like,
        }
    }

    fn comment_row(id: i32, comment_id: i32, user_id: i32, is_like: bool) -> comment_reactions::Model {
        comment_reactions::Model {
            id,
            comment_id,
            user_id,
            is_like,
        }
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(ReactionAction::parse("like"), Some(ReactionAction::Like));
        assert_eq!(ReactionAction::parse("dislike"), Some(ReactionAction::Dislike));
        assert_eq!(ReactionAction::parse("love"), None);
        assert_eq!(ReactionAction::parse(""), None);
        assert_eq!(ReactionAction::parse("LIKE"), None);
    }

    #[tokio::test]
    async fn test_react_to_topic_creates_single_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![],                                 // pas de réaction existante
                vec![topic_row(1, 10, 7, true)],        // INSERT ... RETURNING
                vec![topic_row(1, 10, 7, true)],        // SELECT pour les compteurs
            ])
            .append_exec_results([MockExecResult {
                last_insert_id: 1,
                rows_affected: 1,
            }])
            .into_connection();

        let counts = ReactionService::react_to_topic(&db, 10, 7, ReactionAction::Like)
            .await
            .unwrap();

        assert_eq!(counts.likes, 1);
        assert_eq!(counts.dislikes, 0);
    }

    #[tokio::test]
    async fn test_react_to_topic_same_action_is_noop() {
        // La ligne existe déjà avec le même avis: aucun INSERT ni UPDATE,
        // seulement la relecture des compteurs
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![topic_row(1, 10, 7, true)],        // réaction existante (like)
                vec![topic_row(1, 10, 7, true)],        // SELECT pour les compteurs
            ])
            .into_connection();

        let counts = ReactionService::react_to_topic(&db, 10, 7, ReactionAction::Like)
            .await
            .unwrap();

        assert_eq!(counts.likes, 1);
        assert_eq!(counts.dislikes, 0);
    }

    #[tokio::test]
    async fn test_react_to_topic_switch_updates_row() {
        // user 7 passe de like à dislike, user 8 garde son like:
        // le résultat doit partitionner les deux users
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![topic_row(1, 10, 7, true)],        // réaction existante (like)
                vec![topic_row(1, 10, 7, false)],       // UPDATE ... RETURNING
                vec![
                    topic_row(1, 10, 7, false),
                    topic_row(2, 10, 8, true),
                ],                                      // SELECT pour les compteurs
            ])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let counts = ReactionService::react_to_topic(&db, 10, 7, ReactionAction::Dislike)
            .await
            .unwrap();

        assert_eq!(counts.likes, 1);
        assert_eq!(counts.dislikes, 1);
    }

    #[tokio::test]
    async fn test_react_to_topic_lost_insert_race_retried_as_update() {
        // Le INSERT perd contre une requête concurrente (contrainte UNIQUE):
        // on doit retrouver la ligne et la mettre à jour, pas échouer
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<topic_reactions::Model, _, _>([vec![]]) // pas de réaction existante
            .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                "duplicate key value violates unique constraint".to_string(),
            ))])                                        // INSERT perdu
            .append_query_results([
                vec![topic_row(1, 10, 7, true)],        // relecture de la ligne
                vec![topic_row(1, 10, 7, false)],       // UPDATE ... RETURNING
                vec![topic_row(1, 10, 7, false)],       // SELECT pour les compteurs
            ])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let counts = ReactionService::react_to_topic(&db, 10, 7, ReactionAction::Dislike)
            .await
            .unwrap();

        assert_eq!(counts.likes, 0);
        assert_eq!(counts.dislikes, 1);
    }

    #[tokio::test]
    async fn test_react_to_comment_like_then_dislike() {
        // Propriété: après like puis dislike, le user compte dans les
        // dislikes et plus dans les likes
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![],                                 // 1er appel: rien
                vec![comment_row(1, 5, 7, true)],       // INSERT like
                vec![comment_row(1, 5, 7, true)],       // compteurs
                vec![comment_row(1, 5, 7, true)],       // 2e appel: ligne existante
                vec![comment_row(1, 5, 7, false)],      // UPDATE dislike
                vec![comment_row(1, 5, 7, false)],      // compteurs
            ])
            .append_exec_results([
                MockExecResult { last_insert_id: 1, rows_affected: 1 },
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ])
            .into_connection();

        let counts = ReactionService::react_to_comment(&db, 5, 7, ReactionAction::Like)
            .await
            .unwrap();
        assert_eq!(counts.likes, 1);
        assert_eq!(counts.dislikes, 0);

        let counts = ReactionService::react_to_comment(&db, 5, 7, ReactionAction::Dislike)
            .await
            .unwrap();
        assert_eq!(counts.likes, 0);
        assert_eq!(counts.dislikes, 1);
    }
}
