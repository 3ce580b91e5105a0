// ============================================================================
// TOKEN DE RESET PASSWORD
// ============================================================================
//
// Le lien de reset contient deux segments: /reset-password/{uid}/{token}/
//   - uid : l'id du user encodé en base64 URL-safe (auto-descriptif,
//     ne donne aucun accès à lui seul)
//   - token : "<timestamp_base36>-<preuve HMAC-SHA256>"
//
// La preuve est calculée sur (id, password_hash, last_login, timestamp)
// avec la clé secrète du serveur. Conséquences:
//   - le token n'est pas forgeable sans la clé
//   - il est à usage unique par construction: le reset change le
//     password_hash, un login change last_login, et dans les deux cas
//     toutes les preuves émises avant deviennent invalides
//   - il expire après RESET_TOKEN_HOURS heures (défaut 24)
//
// ============================================================================

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::env;

use crate::models::users;
use crate::utils::jwt::get_jwt_secret;

type HmacSha256 = Hmac<Sha256>;

const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Durée de validité du token en heures (RESET_TOKEN_HOURS, défaut 24)
pub fn reset_token_max_age_secs() -> i64 {
    let hours: i64 = env::var("RESET_TOKEN_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(24);
    hours * 3600
}

/// Encode l'id du user pour le segment {uid} du lien de reset
pub fn encode_uid(user_id: i32) -> String {
    URL_SAFE_NO_PAD.encode(user_id.to_string())
}

/// Décode le segment {uid} en id de user
pub fn decode_uid(uid: &str) -> Result<i32, String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(uid)
        .map_err(|_| "Invalid uid".to_string())?;

    String::from_utf8(bytes)
        .map_err(|_| "Invalid uid".to_string())?
        .parse::<i32>()
        .map_err(|_| "Invalid uid".to_string())
}

/// Génère un token de reset pour l'état actuel du user
pub fn make_token(user: &users::Model) -> String {
    make_token_at(user, Utc::now().timestamp())
}

/// Vérifie un token contre l'état ACTUEL du user
/// Retourne false si le token est malformé, expiré, ou si l'état du user
/// (password_hash, last_login) a changé depuis l'émission
pub fn check_token(user: &users::Model, token: &str) -> bool {
    let Some((ts_part, sig_part)) = token.split_once('-') else {
        return false;
    };

    let Ok(timestamp) = i64::from_str_radix(ts_part, 36) else {
        return false;
    };

    // Expiration
    let now = Utc::now().timestamp();
    if now - timestamp > reset_token_max_age_secs() {
        return false;
    }

    let Ok(signature) = hex::decode(sig_part) else {
        return false;
    };

    // Recalcule la preuve sur l'état actuel et compare en temps constant
    proof_mac(user, timestamp).verify_slice(&signature).is_ok()
}

fn make_token_at(user: &users::Model, timestamp: i64) -> String {
    let proof = proof_mac(user, timestamp).finalize().into_bytes();
    format!("{}-{}", to_base36(timestamp), hex::encode(proof))
}

fn proof_mac(user: &users::Model, timestamp: i64) -> HmacSha256 {
    let secret = get_jwt_secret();

    let last_login = user
        .last_login
        .map(|d| d.and_utc().timestamp().to_string())
        .unwrap_or_default();

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepte une clé de n'importe quelle taille");
    mac.update(
        format!(
            "{}:{}:{}:{}",
            user.id, user.password_hash, last_login, timestamp
        )
        .as_bytes(),
    );
    mac
}

fn to_base36(mut n: i64) -> String {
    if n <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(BASE36_CHARS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("alphabet base36 ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_user() -> users::Model {
        users::Model {
            id: 42,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "pbkdf2_sha256$1000$salt$hash".to_string(),
            last_login: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0),
            date_joined: None,
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let user = test_user();
        let token = make_token(&user);
        assert!(check_token(&user, &token));
    }

    #[test]
    fn test_uid_roundtrip() {
        let uid = encode_uid(42);
        assert_eq!(decode_uid(&uid).unwrap(), 42);
        assert!(decode_uid("%%%").is_err());
        assert!(decode_uid("bm90LWEtbnVtYmVy").is_err()); // "not-a-number"
    }

    #[test]
    fn test_tampered_token_rejected() {
        let user = test_user();
        let token = make_token(&user);

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('0');
        assert!(!check_token(&user, &tampered));

        assert!(!check_token(&user, "garbage"));
        assert!(!check_token(&user, "abc-nothex"));
    }

    #[test]
    fn test_expired_token_rejected() {
        let user = test_user();
        let old_ts = Utc::now().timestamp() - reset_token_max_age_secs() - 60;
        let token = make_token_at(&user, old_ts);
        assert!(!check_token(&user, &token));
    }

    #[test]
    fn test_password_change_invalidates_token() {
        let mut user = test_user();
        let token = make_token(&user);

        user.password_hash = "pbkdf2_sha256$1000$salt$otherhash".to_string();
        assert!(!check_token(&user, &token));
    }

    #[test]
    fn test_login_invalidates_token() {
        let mut user = test_user();
        let token = make_token(&user);

        user.last_login = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0);
        assert!(!check_token(&user, &token));
    }

    #[test]
    fn test_base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(i64::from_str_radix(&to_base36(1749000000), 36).unwrap(), 1749000000);
    }
}
