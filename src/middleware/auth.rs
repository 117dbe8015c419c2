use actix_web::{dev::Payload, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::jwt;

/// Rôles reconnus par le système
/// Admin/Supervisor/Agente sont le personnel interne, Usuario est le client final
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rol {
    Admin,
    Supervisor,
    Agente,
    Usuario,
}

/// Rôles du personnel (accès large aux ressources)
pub const ROLES_STAFF: [Rol; 3] = [Rol::Admin, Rol::Supervisor, Rol::Agente];

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Admin => "Admin",
            Rol::Supervisor => "Supervisor",
            Rol::Agente => "Agente",
            Rol::Usuario => "Usuario",
        }
    }

    pub fn is_staff(&self) -> bool {
        ROLES_STAFF.contains(self)
    }
}

impl FromStr for Rol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Rol::Admin),
            "Supervisor" => Ok(Rol::Supervisor),
            "Agente" => Ok(Rol::Agente),
            "Usuario" => Ok(Rol::Usuario),
            other => Err(format!("Rol desconocido: {}", other)),
        }
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structure qui contient les infos de l'identité authentifiée (usuario ou cliente)
/// Utilisée comme extracteur dans les routes protégées
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub correo: String,
    pub rol: Rol,
}

impl AuthUser {
    /// Vérifie que le rôle du caller fait partie des rôles autorisés pour la route
    pub fn require_role(&self, allowed: &[Rol]) -> Result<(), HttpResponse> {
        if allowed.contains(&self.rol) {
            Ok(())
        } else {
            Err(HttpResponse::Forbidden().json(serde_json::json!({
                "error": "No tienes permisos para esta acción"
            })))
        }
    }
}

fn unauthorized(message: &str) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

/// Implémentation de FromRequest pour AuthUser
/// Cela permet à Actix-Web d'extraire automatiquement AuthUser des requêtes
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Extraire le header Authorization
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => header,
            None => return ready(Err(unauthorized("Token de acceso requerido"))),
        };

        // 2. Convertir le header en string
        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => return ready(Err(unauthorized("Header Authorization inválido"))),
        };

        // 3. Extraire le token (format: "Bearer <token>")
        let token = match auth_str.strip_prefix("Bearer ") {
            Some(t) => t,
            None => {
                return ready(Err(unauthorized(
                    "Formato Authorization inválido (se espera: Bearer <token>)",
                )));
            }
        };

        // 4. Vérifier le token JWT
        let claims = match jwt::verify_token(token) {
            Ok(claims) => claims,
            Err(_) => return ready(Err(unauthorized("Token inválido o expirado"))),
        };

        // 5. Parser le rôle embarqué dans le token
        let rol = match Rol::from_str(&claims.rol) {
            Ok(rol) => rol,
            Err(_) => return ready(Err(unauthorized("Token inválido o expirado"))),
        };

        ready(Ok(AuthUser {
            user_id: claims.sub,
            correo: claims.correo,
            rol,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rol_from_str() {
        assert_eq!(Rol::from_str("Admin").unwrap(), Rol::Admin);
        assert_eq!(Rol::from_str("Usuario").unwrap(), Rol::Usuario);
        assert!(Rol::from_str("Cliente").is_err());
        assert!(Rol::from_str("admin").is_err());
    }

    #[test]
    fn test_is_staff() {
        assert!(Rol::Admin.is_staff());
        assert!(Rol::Supervisor.is_staff());
        assert!(Rol::Agente.is_staff());
        assert!(!Rol::Usuario.is_staff());
    }

    #[test]
    fn test_require_role() {
        let auth = AuthUser {
            user_id: 1,
            correo: "agente@helpdesk.com".to_string(),
            rol: Rol::Agente,
        };

        assert!(auth.require_role(&ROLES_STAFF).is_ok());
        assert!(auth.require_role(&[Rol::Admin]).is_err());
        assert!(auth.require_role(&[Rol::Admin, Rol::Agente]).is_ok());
    }
}
