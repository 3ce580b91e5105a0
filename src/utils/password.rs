use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::Rng;
use base64::{Engine, engine::general_purpose::STANDARD};

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 260000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 22;

// Alphabet du salt, même convention que get_random_string() côté Python
const SALT_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Hash un mot de passe au format Django (compatible avec la table users
/// créée par le backend Python)
/// Format: pbkdf2_sha256$iterations$salt$hash_base64
pub fn hash_password(password: &str) -> Result<String, String> {
    // Générer un salt aléatoire alphanumérique
    let mut rng = rand::thread_rng();
    let salt: String = (0..SALT_LENGTH)
        .map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char)
        .collect();

    hash_with_salt_and_iterations(password, &salt, ITERATIONS)
}

/// Vérifie un mot de passe contre un hash Django
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    // Parser le format: pbkdf2_sha256$iterations$salt$hash
    let parts: Vec<&str> = stored_hash.split('$').collect();
    if parts.len() != 4 {
        return Err("Invalid hash format".to_string());
    }

    if parts[0] != "pbkdf2_sha256" {
        return Err("Unsupported hash algorithm".to_string());
    }

    let iterations = parts[1]
        .parse::<u32>()
        .map_err(|_| "Invalid iterations".to_string())?;
    let salt = parts[2];

    // Recalculer le hash avec le même salt et les mêmes itérations
    let recomputed = hash_with_salt_and_iterations(password, salt, iterations)?;

    // Comparer les deux chaînes complètes (même longueur, pas de short-circuit
    // sur le préfixe: la comparaison porte sur les octets du hash)
    let expected = stored_hash.as_bytes();
    let computed = recomputed.as_bytes();
    if expected.len() != computed.len() {
        return Ok(false);
    }
    let mut diff = 0u8;
    for (a, b) in expected.iter().zip(computed.iter()) {
        diff |= a ^ b;
    }
    Ok(diff == 0)
}

/// Politique de robustesse des mots de passe (mêmes règles que les
/// validateurs du backend Python)
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("This password is too short. It must contain at least 8 characters.".to_string());
    }

    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("This password is entirely numeric.".to_string());
    }

    Ok(())
}

fn hash_with_salt_and_iterations(
    password: &str,
    salt: &str,
    iterations: u32,
) -> Result<String, String> {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key)
        .map_err(|_| "PBKDF2 hash generation failed".to_string())?;

    let hash_b64 = STANDARD.encode(key);

    Ok(format!("pbkdf2_sha256${}${}${}", iterations, salt, hash_b64))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Les tests utilisent peu d'itérations pour rester rapides, le format
    // stocke le nombre d'itérations donc verify_password suit
    fn quick_hash(password: &str) -> String {
        hash_with_salt_and_iterations(password, "testsalt1234567890abcd", 1000).unwrap()
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = quick_hash("Str0ng!Pass");
        assert!(verify_password("Str0ng!Pass", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = quick_hash("Str0ng!Pass");
        assert!(!verify_password("WrongPass1", &hash).unwrap());
    }

    #[test]
    fn test_hash_format() {
        let hash = quick_hash("Str0ng!Pass");
        assert!(hash.starts_with("pbkdf2_sha256$1000$"));
        assert_eq!(hash.split('$').count(), 4);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("whatever", "not-a-hash").is_err());
        assert!(verify_password("whatever", "md5$1$salt$hash").is_err());
    }

    #[test]
    fn test_password_strength_policy() {
        assert!(validate_password_strength("Str0ng!Pass").is_ok());
        assert!(validate_password_strength("short").is_err());
        assert!(validate_password_strength("123456789").is_err());
    }
}
