// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Utilisateurs (username + email uniques, hash Werkzeug)
//   - blacklisted_tokens : Deny-list des refresh tokens révoqués (logout)
//   - tutorials : Tutoriels (slug unique)
//   - topics : Chapitres d'un tutoriel (slug unique, compteur de vues)
//   - comments : Commentaires sous un topic
//   - comment_reactions : Réaction like/dislike par (commentaire, user)
//   - topic_reactions : Réaction like/dislike par (topic, user)
//   - categories : Catégories du blog
//   - tags : Tags du blog
//   - blog_post_tags : Jointure many-to-many blog_posts <-> tags
//   - blog_posts : Articles du blog (draft/published, compteur de vues)
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les tables ont le suffixe "_rust" pour coexister avec Python
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod health;
pub mod users;
pub mod blacklisted_tokens;
pub mod tutorials;
pub mod topics;
pub mod comments;
pub mod comment_reactions;
pub mod topic_reactions;
pub mod categories;
pub mod tags;
pub mod blog_post_tags;
pub mod blog_posts;
pub mod dto;
