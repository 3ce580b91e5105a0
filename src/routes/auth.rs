use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, Set, ActiveModelTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::users::{self, Entity as Users, Column as UserColumn, ActiveModel as UserActiveModel};
use crate::models::blacklisted_tokens::{Entity as BlacklistedTokens, Column as BlacklistedTokenColumn, ActiveModel as BlacklistedTokenActiveModel};
use crate::services::email_service::EmailService;
use crate::utils::{password, jwt, reset_token};
use crate::middleware::AuthUser;

// DTO pour l'inscription
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub password2: String,
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// DTO pour le refresh et le logout
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

// DTO pour la demande de reset password
#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

// DTO pour la confirmation du reset (le uid et le token sont dans l'URL)
#[derive(Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub password: String,
    pub password2: String,
}

// DTO pour changer le mot de passe
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_password2: String,
}

// Représentation publique d'un user (jamais le hash)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl UserResponse {
    fn from_model(user: &users::Model) -> Self {
        UserResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// POST /api/register - Créer un compte (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    log::info!("Register attempt: email={}", body.email);

    // 1. Valider la forme des champs (username, email)
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(e);
    }

    // 2. Les deux mots de passe doivent correspondre
    if body.password != body.password2 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "password": "Passwords must match."
        }));
    }

    // 3. Politique de robustesse
    if let Err(e) = password::validate_password_strength(&body.password) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "password": e
        }));
    }

    // 4. Unicité du username (la contrainte UNIQUE de la BD reste le filet)
    match Users::find()
        .filter(UserColumn::Username.eq(&body.username))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "username": "A user with that username already exists."
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 5. Unicité de l'email
    match Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "email": "A user with that email already exists."
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 6. Hash le mot de passe
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to hash password: {}", e)
            }));
        }
    };

    // 7. Créer l'utilisateur
    let new_user = UserActiveModel {
        username: Set(body.username.clone()),
        email: Set(body.email.clone()),
        password_hash: Set(password_hash),
        last_login: Set(None),
        date_joined: Set(Some(Utc::now().naive_utc())),
        ..Default::default()
    };

    let user = match new_user.insert(db.get_ref()).await {
        Ok(user) => user,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to create user: {}", e)
            }));
        }
    };

    log::info!("User registered successfully: id={}, email={}", user.id, user.email);

    HttpResponse::Created().json(serde_json::json!({
        "user": UserResponse::from_model(&user)
    }))
}

/// POST /api/login - Se connecter (PUBLIC)
/// Username inconnu et mauvais mot de passe retournent la MÊME erreur
/// pour ne pas révéler quels comptes existent
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    log::info!("Login attempt: username={}", body.username);

    // 1. Trouver l'utilisateur
    let user = match Users::find()
        .filter(UserColumn::Username.eq(&body.username))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "detail": "Invalid credentials."
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 2. Vérifier le mot de passe
    let is_valid = match password::verify_password(&body.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Password verification error: {}", e)
            }));
        }
    };

    if !is_valid {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "detail": "Invalid credentials."
        }));
    }

    // 3. Mettre à jour last_login (invalide au passage les tokens de reset
    // en circulation, la preuve HMAC couvre ce champ)
    let mut active: UserActiveModel = user.into();
    active.last_login = Set(Some(Utc::now().naive_utc()));

    let user = match active.update(db.get_ref()).await {
        Ok(user) => user,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to update last_login: {}", e)
            }));
        }
    };

    // 4. Générer la paire access + refresh
    let token = match jwt::generate_token_pair(user.id, &user.username) {
        Ok(pair) => pair,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    log::info!("User logged in successfully: id={}, username={}", user.id, user.username);

    HttpResponse::Ok().json(serde_json::json!({
        "user": UserResponse::from_model(&user),
        "token": token
    }))
}

/// POST /api/token/refresh - Obtenir un nouveau token d'accès (PUBLIC)
/// Le refresh token n'est pas tourné: il est renvoyé tel quel
#[post("/token/refresh")]
pub async fn refresh_token(
    body: web::Json<RefreshRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    log::info!("Token refresh attempt");

    // 1. Vérifier signature, expiration et type du refresh token
    let claims = match jwt::verify_refresh_token(&body.refresh) {
        Ok(claims) => claims,
        Err(e) => {
            log::error!("Token refresh failed: {}", e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": e
            }));
        }
    };

    // 2. Vérifier la blacklist: une révocation déjà commitée doit être vue ici
    match BlacklistedTokens::find()
        .filter(BlacklistedTokenColumn::Jti.eq(&claims.jti))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            log::error!("Token refresh failed: token is blacklisted");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Token is blacklisted"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 3. Retrouver l'utilisateur pour les claims du nouveau token d'accès
    let user = match Users::find_by_id(claims.sub).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "User no longer exists"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 4. Générer le nouveau token d'accès
    let access = match jwt::generate_access_token(user.id, &user.username) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    log::info!("Token refreshed successfully: user_id={}", user.id);

    HttpResponse::Ok().json(serde_json::json!({
        "access": access,
        "refresh": body.refresh
    }))
}

/// POST /api/logout - Révoquer le refresh token (PROTÉGÉE)
/// Révoquer un token déjà révoqué est une erreur, pas un no-op
#[post("/logout")]
pub async fn logout(
    auth_user: AuthUser,
    body: web::Json<RefreshRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    log::info!("Logout attempt: user_id={}", auth_user.user_id);

    // 1. Vérifier le refresh token fourni
    let claims = match jwt::verify_refresh_token(&body.refresh) {
        Ok(claims) => claims,
        Err(e) => {
            log::error!("Logout failed for user_id={}: {}", auth_user.user_id, e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid token or already blacklisted"
            }));
        }
    };

    // 2. Refuser s'il est déjà dans la blacklist
    match BlacklistedTokens::find()
        .filter(BlacklistedTokenColumn::Jti.eq(&claims.jti))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            log::error!("Logout failed for user_id={}: already blacklisted", auth_user.user_id);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid token or already blacklisted"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 3. Insérer le jti dans la blacklist, avec l'expiration du token
    // lui-même pour permettre la purge de la table
    let expires_at = match chrono::DateTime::from_timestamp(claims.exp, 0) {
        Some(d) => d.naive_utc(),
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid token or already blacklisted"
            }));
        }
    };

    let entry = BlacklistedTokenActiveModel {
        jti: Set(claims.jti.clone()),
        user_id: Set(claims.sub),
        expires_at: Set(expires_at),
        created_at: Set(Some(Utc::now().naive_utc())),
        ..Default::default()
    };

    // La contrainte UNIQUE sur jti tranche les logout concurrents:
    // le perdant du INSERT reçoit la même erreur qu'un double logout
    if let Err(e) = entry.insert(db.get_ref()).await {
        log::error!("Logout failed for user_id={}: {}", auth_user.user_id, e);
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid token or already blacklisted"
        }));
    }

    log::info!("Logout successful: user_id={}", auth_user.user_id);

    HttpResponse::Ok().json(serde_json::json!({
        "detail": "Logout successful"
    }))
}

/// POST /api/request-password-reset - Demander un lien de reset (PUBLIC)
#[post("/request-password-reset")]
pub async fn request_password_reset(
    body: web::Json<PasswordResetRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    log::info!("Password reset requested: email={}", body.email);

    // 1. Trouver l'utilisateur par email
    let user = match Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "email": "User with this email does not exist."
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 2. Construire le lien uid/token
    let uid = reset_token::encode_uid(user.id);
    let token = reset_token::make_token(&user);

    let frontend_url = std::env::var("FRONTEND_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let reset_link = format!("{}/reset-password/{}/{}/", frontend_url, uid, token);

    // 3. Envoyer le mail, fire-and-forget: un échec d'envoi est loggé mais
    // n'annule pas l'émission du token
    if let Err(e) = EmailService::send_password_reset_email(&user.email, &reset_link) {
        log::error!("Failed to send password reset email to {}: {}", user.email, e);
    }

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Password reset link sent to your email."
    }))
}

/// POST /api/reset-password/{uid}/{token}/ - Confirmer le reset (PUBLIC)
#[post("/reset-password/{uid}/{token}/")]
pub async fn reset_password(
    path: web::Path<(String, String)>,
    body: web::Json<PasswordResetConfirmRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (uid, token) = path.into_inner();

    // 1. Décoder le uid
    let user_id = match reset_token::decode_uid(&uid) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid reset link"
            }));
        }
    };

    // 2. Retrouver l'utilisateur
    let user = match Users::find_by_id(user_id).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid reset link"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 3. Vérifier la preuve contre l'état ACTUEL du compte: un changement
    // de mot de passe ou un login depuis l'émission la rend invalide
    if !reset_token::check_token(&user, &token) {
        log::error!("Password reset failed: invalid token for user_id={}", user.id);
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid or expired token"
        }));
    }

    // 4. Valider le nouveau mot de passe
    if body.password != body.password2 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "password": "Passwords must match."
        }));
    }

    if let Err(e) = password::validate_password_strength(&body.password) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "password": e
        }));
    }

    // 5. Remplacer le hash (consomme le token: la preuve ne revérifiera plus)
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to hash password: {}", e)
            }));
        }
    };

    let mut active: UserActiveModel = user.into();
    active.password_hash = Set(password_hash);

    match active.update(db.get_ref()).await {
        Ok(user) => {
            log::info!("Password reset successful: user_id={}", user.id);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Password reset successful"
            }))
        }
        Err(e) => {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to update password: {}", e)
            }))
        }
    }
}

/// POST /api/change-password - Changer son mot de passe (PROTÉGÉE)
#[post("/change-password")]
pub async fn change_password(
    auth_user: AuthUser,
    body: web::Json<ChangePasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Récupérer l'utilisateur
    let user = match Users::find_by_id(auth_user.user_id).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "User not found"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 2. Vérifier le mot de passe actuel
    let is_valid = match password::verify_password(&body.current_password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Password verification error: {}", e)
            }));
        }
    };

    if !is_valid {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "current_password": "Current password is incorrect."
        }));
    }

    // 3. Valider le nouveau mot de passe
    if body.new_password != body.new_password2 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "new_password": "Passwords must match."
        }));
    }

    if let Err(e) = password::validate_password_strength(&body.new_password) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "new_password": e
        }));
    }

    // 4. Hasher et remplacer (invalide aussi les tokens de reset émis avant)
    let new_password_hash = match password::hash_password(&body.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to hash password: {}", e)
            }));
        }
    };

    let mut active: UserActiveModel = user.into();
    active.password_hash = Set(new_password_hash);

    match active.update(db.get_ref()).await {
        Ok(_) => {
            log::info!("Password changed successfully: user_id={}", auth_user.user_id);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Password changed successfully"
            }))
        }
        Err(e) => {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to update password: {}", e)
            }))
        }
    }
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(refresh_token)
        .service(logout)
        .service(request_password_reset)
        .service(reset_password)
        .service(change_password);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn user_row(id: i32, username: &str, email: &str, password: &str) -> users::Model {
        users::Model {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password::hash_password(password).unwrap(),
            last_login: None,
            date_joined: Some(Utc::now().naive_utc()),
        }
    }

    #[actix_web::test]
    async fn test_register_password_mismatch_returns_400() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(register),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({
                "username": "alice",
                "email": "a@x.com",
                "password": "Str0ng!Pass",
                "password2": "Different1!"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_register_weak_password_returns_400() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(register),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({
                "username": "alice",
                "email": "a@x.com",
                "password": "123456789",
                "password2": "123456789"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_register_then_login_with_same_credentials() {
        // Inscription: username libre, email libre, INSERT
        let registered = user_row(1, "alice", "a@x.com", "Str0ng!Pass");
        let logged_in = users::Model {
            last_login: Some(Utc::now().naive_utc()),
            ..registered.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![],                        // username pas encore pris
                vec![],                        // email pas encore pris
                vec![registered.clone()],      // INSERT ... RETURNING
                vec![registered.clone()],      // login: SELECT par username
                vec![logged_in],               // login: UPDATE last_login
            ])
            .append_exec_results([
                MockExecResult { last_insert_id: 1, rows_affected: 1 },
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ])
            .into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(register)
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({
                "username": "alice",
                "email": "a@x.com",
                "password": "Str0ng!Pass",
                "password2": "Str0ng!Pass"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({
                "username": "alice",
                "password": "Str0ng!Pass"
            }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user"]["username"], "alice");
        assert!(!body["token"]["access"].as_str().unwrap().is_empty());
        assert!(!body["token"]["refresh"].as_str().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_login_wrong_password_and_unknown_user_same_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![user_row(1, "alice", "a@x.com", "Str0ng!Pass")], // mauvais password
                vec![],                                              // username inconnu
            ])
            .into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({
                "username": "alice",
                "password": "WrongPass1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let wrong_password_body = test::read_body(resp).await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({
                "username": "nobody",
                "password": "WrongPass1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let unknown_user_body = test::read_body(resp).await;

        // Aucune différence observable entre les deux échecs
        assert_eq!(wrong_password_body, unknown_user_body);
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&wrong_password_body).unwrap()["detail"],
            "Invalid credentials."
        );
    }

    #[actix_web::test]
    async fn test_refresh_returns_new_access_and_same_refresh() {
        let pair = jwt::generate_token_pair(1, "alice").unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<crate::models::blacklisted_tokens::Model, _, _>([
                vec![],                        // jti absent de la blacklist
            ])
            .append_query_results([
                vec![user_row(1, "alice", "a@x.com", "Str0ng!Pass")],
            ])
            .into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(refresh_token),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/token/refresh")
            .set_json(serde_json::json!({ "refresh": pair.refresh }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(!body["access"].as_str().unwrap().is_empty());
        assert_eq!(body["refresh"], pair.refresh);
    }

    #[actix_web::test]
    async fn test_refresh_with_blacklisted_token_fails() {
        let pair = jwt::generate_token_pair(1, "alice").unwrap();
        let claims = jwt::verify_refresh_token(&pair.refresh).unwrap();

        let blacklisted = crate::models::blacklisted_tokens::Model {
            id: 1,
            jti: claims.jti.clone(),
            user_id: 1,
            expires_at: Utc::now().naive_utc(),
            created_at: Some(Utc::now().naive_utc()),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![blacklisted]])
            .into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(refresh_token),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/token/refresh")
            .set_json(serde_json::json!({ "refresh": pair.refresh }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_logout_twice_fails_on_second_call() {
        let pair = jwt::generate_token_pair(1, "alice").unwrap();
        let claims = jwt::verify_refresh_token(&pair.refresh).unwrap();

        let entry = crate::models::blacklisted_tokens::Model {
            id: 1,
            jti: claims.jti.clone(),
            user_id: 1,
            expires_at: Utc::now().naive_utc(),
            created_at: Some(Utc::now().naive_utc()),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![],                        // 1er logout: jti pas encore blacklisté
                vec![entry.clone()],           // INSERT ... RETURNING
                vec![entry],                   // 2e logout: jti déjà blacklisté
            ])
            .append_exec_results([MockExecResult {
                last_insert_id: 1,
                rows_affected: 1,
            }])
            .into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .service(logout),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/logout")
            .insert_header(("Authorization", format!("Bearer {}", pair.access)))
            .set_json(serde_json::json!({ "refresh": pair.refresh }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = test::TestRequest::post()
            .uri("/logout")
            .insert_header(("Authorization", format!("Bearer {}", pair.access)))
            .set_json(serde_json::json!({ "refresh": pair.refresh }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
