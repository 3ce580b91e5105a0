pub mod health;
pub mod auth;
pub mod tutorials;
pub mod comments;
pub mod blogs;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(tutorials::tutorials_routes)
            .configure(comments::comments_routes)
            .configure(blogs::blogs_routes)
    );
}
