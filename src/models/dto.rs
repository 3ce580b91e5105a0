//pour les réponses structurées des endpoints tutorials/topics/blogs
use serde::Serialize;

// Compteurs de réactions d'un sujet (topic ou commentaire)
#[derive(Debug, Serialize)]
pub struct ReactionCounts {
    pub likes: u64,
    pub dislikes: u64,
}

// 1 commentaire avec ses totaux de réactions
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub user: String, // username de l'auteur
    pub content: String,
    pub total_likes: u64,
    pub total_dislikes: u64,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
}

// Titre de topic pour les listes imbriquées
#[derive(Debug, Serialize)]
pub struct TopicTitle {
    pub id: i32,
    pub title: String,
    pub slug: String,
}

// 1 tutoriel dans la liste
#[derive(Debug, Serialize)]
pub struct TutorialListItem {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub total_topics: usize,
    pub topics: Vec<TopicTitle>,
}

// Détail d'un tutoriel
#[derive(Debug, Serialize)]
pub struct TutorialDetail {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
    pub topics: Vec<TopicTitle>,
    pub total_topics: usize,
}

// Détail d'un topic avec commentaires et réactions
#[derive(Debug, Serialize)]
pub struct TopicDetail {
    pub id: i32,
    pub tutorial: i32,
    pub title: String,
    pub content: String,
    pub video_url: Option<String>,
    pub views: i32,
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
    pub comments: Vec<CommentResponse>,
    pub reactions: ReactionCounts,
}

// 1 blog post avec sa catégorie, ses tags et son auteur
#[derive(Debug, Serialize)]
pub struct BlogPostResponse {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub category: Option<super::categories::Model>,
    pub tags: Vec<super::tags::Model>,
    pub author: String, // username de l'auteur
    pub status: String,
    pub views: i32,
    pub read_time: i32,
    pub published_date: Option<String>, // Format: "2025-12-20 14:30:00"
    pub created_at: Option<chrono::NaiveDateTime>,
    pub updated_at: Option<chrono::NaiveDateTime>,
    pub is_featured: bool,
}
