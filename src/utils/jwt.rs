use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};
use std::env;
use uuid::Uuid;

// Claims du token d'accès (courte durée, stateless)
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: i32,           // user_id
    pub username: String,
    pub exp: i64,           // expiration timestamp
    pub token_type: String, // toujours "access"
}

// Claims du refresh token (longue durée, révocable via la blacklist)
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: i32,           // user_id
    pub exp: i64,           // expiration timestamp
    pub token_type: String, // toujours "refresh"
    pub jti: String,        // identifiant unique (UUID v4) pour la révocation
}

// Paire de tokens retournée au login
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Récupère la clé secrète JWT depuis les variables d'environnement
pub(crate) fn get_jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| {
        eprintln!("⚠️  WARNING: JWT_SECRET not found in .env, using default (INSECURE)");
        "default-insecure-key-change-this".to_string()
    })
}

/// Durée de vie du token d'accès en minutes (ACCESS_TOKEN_MINUTES, défaut 15)
fn access_token_minutes() -> i64 {
    env::var("ACCESS_TOKEN_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(15)
}

/// Durée de vie du refresh token en jours (REFRESH_TOKEN_DAYS, défaut 7)
fn refresh_token_days() -> i64 {
    env::var("REFRESH_TOKEN_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(7)
}

/// Génère un token d'accès pour un utilisateur
pub fn generate_access_token(user_id: i32, username: &str) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::minutes(access_token_minutes()))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = AccessClaims {
        sub: user_id,
        username: username.to_string(),
        exp: expiration,
        token_type: "access".to_string(),
    };

    let secret = get_jwt_secret();

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Génère la paire access + refresh pour un utilisateur
/// Le refresh token reçoit un jti unique qui permet de le révoquer plus tard
pub fn generate_token_pair(user_id: i32, username: &str) -> Result<TokenPair, String> {
    let access = generate_access_token(user_id, username)?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::days(refresh_token_days()))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = RefreshClaims {
        sub: user_id,
        exp: expiration,
        token_type: "refresh".to_string(),
        jti: Uuid::new_v4().to_string(),
    };

    let secret = get_jwt_secret();

    let refresh = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))?;

    Ok(TokenPair { access, refresh })
}

/// Vérifie et décode un token d'accès
pub fn verify_access_token(token: &str) -> Result<AccessClaims, String> {
    let secret = get_jwt_secret();

    let claims = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))?;

    if claims.token_type != "access" {
        return Err("Invalid token type".to_string());
    }

    Ok(claims)
}

/// Vérifie et décode un refresh token
/// La présence du jti dans la blacklist est vérifiée par l'appelant (accès BD)
pub fn verify_refresh_token(token: &str) -> Result<RefreshClaims, String> {
    let secret = get_jwt_secret();

    let claims = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))?;

    if claims.token_type != "refresh" {
        return Err("Invalid token type".to_string());
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_access_token() {
        let user_id = 123;
        let username = "testuser";

        let token = generate_access_token(user_id, username).unwrap();
        let claims = verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, username);
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_generate_pair_and_verify_refresh_token() {
        let pair = generate_token_pair(42, "alice").unwrap();

        let claims = verify_refresh_token(&pair.refresh).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.token_type, "refresh");
        assert!(!claims.jti.is_empty());

        // L'access de la paire reste un access token valide
        let access_claims = verify_access_token(&pair.access).unwrap();
        assert_eq!(access_claims.sub, 42);
    }

    #[test]
    fn test_each_refresh_token_gets_a_unique_jti() {
        let pair1 = generate_token_pair(1, "alice").unwrap();
        let pair2 = generate_token_pair(1, "alice").unwrap();

        let jti1 = verify_refresh_token(&pair1.refresh).unwrap().jti;
        let jti2 = verify_refresh_token(&pair2.refresh).unwrap().jti;

        assert_ne!(jti1, jti2);
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let access = generate_access_token(7, "bob").unwrap();
        assert!(verify_refresh_token(&access).is_err());
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let pair = generate_token_pair(7, "bob").unwrap();
        assert!(verify_access_token(&pair.refresh).is_err());
    }

    #[test]
    fn test_expired_refresh_token_rejected() {
        let claims = RefreshClaims {
            sub: 7,
            exp: Utc::now().timestamp() - 7200, // expiré depuis 2h
            token_type: "refresh".to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        let secret = get_jwt_secret();
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
            .unwrap();

        assert!(verify_refresh_token(&token).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_access_token("invalid.token.here");
        assert!(result.is_err());
    }
}
