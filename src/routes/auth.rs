use actix_web::{post, get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, ColumnTrait, Set, ActiveModelTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::middleware::{AuthUser, Rol};
use crate::models::clientes::{Entity as Clientes, Column as ClienteColumn, ActiveModel as ClienteActiveModel};
use crate::models::usuarios::{Entity as Usuarios, Column as UsuarioColumn, ActiveModel as UsuarioActiveModel};
use crate::utils::{password, jwt};
use std::str::FromStr;

// DTO pour l'inscription publique d'un client
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub nombre: String,
    #[validate(email)]
    pub correo: String,
    pub telefono: Option<String>,
    #[validate(length(min = 6))]
    pub password: String,
    pub empresa: Option<String>,
    pub area: Option<String>,
    pub direccion: Option<String>,
    pub notas: Option<String>,
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub correo: String,
    pub password: String,
}

// DTO pour changer le mot de passe
#[derive(Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6))]
    pub new_password: String,
}

// Profil renvoyé après login (jamais le hash)
#[derive(Serialize)]
pub struct PerfilAutenticado {
    pub id: i32,
    pub nombre: String,
    pub correo: String,
    pub rol: Rol,
    pub tipo: String, // "usuario" (staff) ou "cliente"
    pub estado: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: PerfilAutenticado,
}

/// POST /auth/register - Inscription publique d'un client (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 1. Vérifier si le correo est déjà enregistré
    let existing = Clientes::find()
        .filter(ClienteColumn::Correo.eq(&body.correo))
        .one(db.get_ref())
        .await;

    match existing {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "El correo ya está registrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al registrar cliente",
                "details": format!("{}", e)
            }));
        }
        _ => {}
    }

    // 2. Hash le mot de passe
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(_) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al registrar cliente"
            }));
        }
    };

    // 3. Créer le client (actif par défaut)
    let nuevo_cliente = ClienteActiveModel {
        nombre: Set(body.nombre.clone()),
        correo: Set(body.correo.clone()),
        telefono: Set(body.telefono.clone()),
        password_hash: Set(Some(password_hash)),
        empresa: Set(body.empresa.clone()),
        area: Set(body.area.clone()),
        direccion: Set(body.direccion.clone()),
        notas: Set(body.notas.clone()),
        activo: Set(true),
        ..Default::default()
    };

    match nuevo_cliente.insert(db.get_ref()).await {
        Ok(cliente) => HttpResponse::Created().json(serde_json::json!({
            "message": "Cliente registrado correctamente",
            "cliente_id": cliente.cliente_id
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al registrar cliente",
            "details": format!("{}", e)
        })),
    }
}

/// POST /auth/login - Connexion usuarios + clientes (PUBLIC)
/// Cherche d'abord dans usuarios, puis dans clientes
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Valider les champs requis
    if body.correo.is_empty() || body.password.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Correo y contraseña son requeridos"
        }));
    }

    // 2. Chercher d'abord dans usuarios
    let usuario = match Usuarios::find()
        .filter(UsuarioColumn::Correo.eq(&body.correo))
        .one(db.get_ref())
        .await
    {
        Ok(usuario) => usuario,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error interno del servidor",
                "details": format!("{}", e)
            }));
        }
    };

    if let Some(usuario) = usuario {
        // 3a. Compte désactivé → 401
        if usuario.estado != "activo" {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Usuario desactivado"
            }));
        }

        // 4a. Vérifier le mot de passe
        match password::verify_password(&body.password, &usuario.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "Credenciales inválidas"
                }));
            }
            Err(_) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error interno del servidor"
                }));
            }
        }

        // 5a. Le rôle stocké doit être un rôle connu
        let rol = match Rol::from_str(&usuario.rol) {
            Ok(rol) => rol,
            Err(_) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error interno del servidor"
                }));
            }
        };

        // 6a. Générer le token et répondre
        let token = match jwt::generate_token(usuario.usuario_id, &usuario.correo, rol.as_str()) {
            Ok(token) => token,
            Err(_) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error interno del servidor"
                }));
            }
        };

        return HttpResponse::Ok().json(LoginResponse {
            message: "Login exitoso".to_string(),
            token,
            user: PerfilAutenticado {
                id: usuario.usuario_id,
                nombre: usuario.nombre_completo,
                correo: usuario.correo,
                rol,
                tipo: "usuario".to_string(),
                estado: usuario.estado,
            },
        });
    }

    // 2b. Sinon chercher dans clientes
    let cliente = match Clientes::find()
        .filter(ClienteColumn::Correo.eq(&body.correo))
        .one(db.get_ref())
        .await
    {
        Ok(Some(cliente)) => cliente,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Credenciales inválidas"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error interno del servidor",
                "details": format!("{}", e)
            }));
        }
    };

    // 3b. Client désactivé → 401
    if !cliente.activo {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Usuario desactivado"
        }));
    }

    // 4b. Un client sans mot de passe ne peut pas se connecter
    let password_hash = match cliente.password_hash {
        Some(ref hash) => hash,
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Credenciales inválidas"
            }));
        }
    };

    match password::verify_password(&body.password, password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Credenciales inválidas"
            }));
        }
        Err(_) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error interno del servidor"
            }));
        }
    }

    // 5b. Les clients s'authentifient toujours avec le rôle Usuario
    let rol = Rol::Usuario;

    let token = match jwt::generate_token(cliente.cliente_id, &cliente.correo, rol.as_str()) {
        Ok(token) => token,
        Err(_) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error interno del servidor"
            }));
        }
    };

    HttpResponse::Ok().json(LoginResponse {
        message: "Login exitoso".to_string(),
        token,
        user: PerfilAutenticado {
            id: cliente.cliente_id,
            nombre: cliente.nombre,
            correo: cliente.correo,
            rol,
            tipo: "cliente".to_string(),
            estado: (if cliente.activo { "activo" } else { "inactivo" }).to_string(),
        },
    })
}

/// GET /auth/verify - Vérifier le token (PROTÉGÉE)
#[get("/verify")]
pub async fn verify(auth_user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Token válido",
        "user": {
            "id": auth_user.user_id,
            "correo": auth_user.correo,
            "rol": auth_user.rol
        }
    }))
}

/// POST /auth/change-password - Changer son propre mot de passe (PROTÉGÉE)
/// Résout l'identité comme le login: usuarios d'abord, puis clientes
#[post("/change-password")]
pub async fn change_password(
    auth_user: AuthUser,
    body: web::Json<ChangePasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 1. Chercher le compte dans usuarios
    let usuario = match Usuarios::find()
        .filter(UsuarioColumn::Correo.eq(&auth_user.correo))
        .one(db.get_ref())
        .await
    {
        Ok(usuario) => usuario,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error interno del servidor",
                "details": format!("{}", e)
            }));
        }
    };

    if let Some(usuario) = usuario {
        // 2a. Vérifier le mot de passe actuel
        match password::verify_password(&body.current_password, &usuario.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "La contraseña actual es incorrecta"
                }));
            }
            Err(_) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error interno del servidor"
                }));
            }
        }

        // 3a. Hasher et enregistrer le nouveau mot de passe
        let new_hash = match password::hash_password(&body.new_password) {
            Ok(hash) => hash,
            Err(_) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error interno del servidor"
                }));
            }
        };

        let mut active: UsuarioActiveModel = usuario.into();
        active.password_hash = Set(new_hash);

        return match active.update(db.get_ref()).await {
            Ok(_) => HttpResponse::Ok().json(serde_json::json!({
                "message": "Contraseña actualizada correctamente"
            })),
            Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al actualizar contraseña",
                "details": format!("{}", e)
            })),
        };
    }

    // 1b. Sinon chercher dans clientes
    let cliente = match Clientes::find()
        .filter(ClienteColumn::Correo.eq(&auth_user.correo))
        .one(db.get_ref())
        .await
    {
        Ok(Some(cliente)) => cliente,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Usuario no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error interno del servidor",
                "details": format!("{}", e)
            }));
        }
    };

    let current_hash = match cliente.password_hash {
        Some(ref hash) => hash.clone(),
        None => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "La contraseña actual es incorrecta"
            }));
        }
    };

    match password::verify_password(&body.current_password, &current_hash) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "La contraseña actual es incorrecta"
            }));
        }
        Err(_) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error interno del servidor"
            }));
        }
    }

    let new_hash = match password::hash_password(&body.new_password) {
        Ok(hash) => hash,
        Err(_) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error interno del servidor"
            }));
        }
    };

    let mut active: ClienteActiveModel = cliente.into();
    active.password_hash = Set(Some(new_hash));

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Contraseña actualizada correctamente"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al actualizar contraseña",
            "details": format!("{}", e)
        })),
    }
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(verify)
            .service(change_password)
    );
}
