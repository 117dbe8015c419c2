use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};
use std::env;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,        // usuario_id ou cliente_id
    pub correo: String,
    pub rol: String,
    pub iat: i64,        // issued-at timestamp
    pub exp: i64,        // expiration timestamp
}

/// Récupère la clé secrète JWT depuis les variables d'environnement
fn get_jwt_secret() -> String {
    env::var("JWT_SECRET").unwrap_or_else(|_| {
        eprintln!("⚠️  WARNING: JWT_SECRET not found in .env, using default (INSECURE)");
        "default-insecure-key-change-this".to_string()
    })
}

/// Durée de vie des tokens en heures (24h par défaut, configurable)
fn get_expiration_hours() -> i64 {
    env::var("JWT_EXPIRES_HOURS")
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(24)
}

/// Génère un JWT token pour un utilisateur ou un client
pub fn generate_token(user_id: i32, correo: &str, rol: &str) -> Result<String, String> {
    generate_token_with_expiration(user_id, correo, rol, get_expiration_hours())
}

fn generate_token_with_expiration(
    user_id: i32,
    correo: &str,
    rol: &str,
    hours: i64,
) -> Result<String, String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(hours))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        correo: correo.to_string(),
        rol: rol.to_string(),
        iat: now.timestamp(),
        exp: expiration,
    };

    let secret = get_jwt_secret();

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un JWT token
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let secret = get_jwt_secret();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_token() {
        let token = generate_token(7, "agente@helpdesk.com", "Agente").unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.correo, "agente@helpdesk.com");
        assert_eq!(claims.rol, "Agente");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token() {
        let token = generate_token_with_expiration(1, "a@b.com", "Usuario", -1).unwrap();
        let result = verify_token(&token);
        assert!(result.is_err());
    }

    #[test]
    fn test_tampered_token() {
        let token = generate_token(1, "a@b.com", "Usuario").unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('x') { 'y' } else { 'x' });
        assert!(verify_token(&tampered).is_err());
    }
}
