use actix_web::{delete, get, patch, post, web, HttpResponse};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::{AuthUser, Rol, ROLES_STAFF};
use crate::models::usuarios::{ActiveModel as UsuarioActiveModel, Column as UsuarioColumn, Entity as Usuarios};
use crate::utils::password;
use std::str::FromStr;

// DTO pour la création d'un usuario (par un Admin)
#[derive(Deserialize, Validate)]
pub struct CreateUsuarioRequest {
    #[validate(length(min = 1))]
    pub nombre_completo: String,
    #[validate(email)]
    pub correo: String,
    pub telefono: Option<String>,
    pub rol: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub estado: Option<String>,
}

// DTO de mise à jour partielle: uniquement les champs mutables
#[derive(Deserialize, Default)]
pub struct UpdateUsuarioRequest {
    pub nombre_completo: Option<String>,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub rol: Option<String>,
    pub estado: Option<String>,
    pub password: Option<String>,
}

impl UpdateUsuarioRequest {
    fn is_empty(&self) -> bool {
        self.nombre_completo.is_none()
            && self.correo.is_none()
            && self.telefono.is_none()
            && self.rol.is_none()
            && self.estado.is_none()
            && self.password.is_none()
    }
}

/// GET /usuarios - Liste des usuarios (staff)
#[get("")]
pub async fn get_usuarios(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    match Usuarios::find().all(db.get_ref()).await {
        Ok(usuarios) => HttpResponse::Ok().json(usuarios),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al obtener usuarios",
            "details": format!("{}", e)
        })),
    }
}

/// GET /usuarios/{usuario_id} - Un usuario par id (staff)
#[get("/{usuario_id}")]
pub async fn get_usuario_by_id(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    let usuario_id = path.into_inner();

    match Usuarios::find_by_id(usuario_id).one(db.get_ref()).await {
        Ok(Some(usuario)) => HttpResponse::Ok().json(usuario),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Usuario no encontrado"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al obtener usuario",
            "details": format!("{}", e)
        })),
    }
}

/// POST /usuarios - Créer un usuario (Admin)
#[post("")]
pub async fn post_usuario(
    auth_user: AuthUser,
    body: web::Json<CreateUsuarioRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&[Rol::Admin]) {
        return resp;
    }

    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 1. Le rôle doit être un rôle connu
    if Rol::from_str(&body.rol).is_err() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Rol inválido. Debe ser: Admin, Supervisor, Agente o Usuario"
        }));
    }

    // 2. Correo unique
    match Usuarios::find()
        .filter(UsuarioColumn::Correo.eq(&body.correo))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "El correo ya está registrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al crear usuario",
                "details": format!("{}", e)
            }));
        }
        _ => {}
    }

    // 3. Hash du mot de passe avant stockage
    let password_hash = match password::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(_) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al crear usuario"
            }));
        }
    };

    let nuevo = UsuarioActiveModel {
        nombre_completo: Set(body.nombre_completo.clone()),
        correo: Set(body.correo.clone()),
        telefono: Set(body.telefono.clone()),
        rol: Set(body.rol.clone()),
        password_hash: Set(password_hash),
        estado: Set(body.estado.clone().unwrap_or_else(|| "activo".to_string())),
        ..Default::default()
    };

    match nuevo.insert(db.get_ref()).await {
        Ok(usuario) => HttpResponse::Created().json(serde_json::json!({
            "message": "Usuario creado correctamente",
            "usuario_id": usuario.usuario_id
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al crear usuario",
            "details": format!("{}", e)
        })),
    }
}

/// PATCH /usuarios/{usuario_id} - Mise à jour partielle (Admin)
#[patch("/{usuario_id}")]
pub async fn patch_usuario(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateUsuarioRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&[Rol::Admin]) {
        return resp;
    }

    // Aucun champ reconnu → 400, aucune écriture
    if body.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No se proporcionaron campos válidos para actualizar."
        }));
    }

    if let Some(ref rol) = body.rol {
        if Rol::from_str(rol).is_err() {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Rol inválido. Debe ser: Admin, Supervisor, Agente o Usuario"
            }));
        }
    }

    let usuario_id = path.into_inner();

    let usuario = match Usuarios::find_by_id(usuario_id).one(db.get_ref()).await {
        Ok(Some(usuario)) => usuario,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Usuario no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al actualizar usuario",
                "details": format!("{}", e)
            }));
        }
    };

    let mut active: UsuarioActiveModel = usuario.into();

    if let Some(ref nombre_completo) = body.nombre_completo {
        active.nombre_completo = Set(nombre_completo.clone());
    }
    if let Some(ref correo) = body.correo {
        active.correo = Set(correo.clone());
    }
    if let Some(ref telefono) = body.telefono {
        active.telefono = Set(Some(telefono.clone()));
    }
    if let Some(ref rol) = body.rol {
        active.rol = Set(rol.clone());
    }
    if let Some(ref estado) = body.estado {
        active.estado = Set(estado.clone());
    }
    // Nouveau mot de passe → rehash
    if let Some(ref nuevo_password) = body.password {
        match password::hash_password(nuevo_password) {
            Ok(hash) => active.password_hash = Set(hash),
            Err(_) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al actualizar usuario"
                }));
            }
        }
    }

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Usuario actualizado correctamente"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al actualizar usuario",
            "details": format!("{}", e)
        })),
    }
}

/// DELETE /usuarios/{usuario_id} - Désactivation logique (Admin)
/// Jamais de suppression physique: estado passe à 'inactivo'
#[delete("/{usuario_id}")]
pub async fn delete_usuario(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&[Rol::Admin]) {
        return resp;
    }

    let usuario_id = path.into_inner();

    let usuario = match Usuarios::find_by_id(usuario_id).one(db.get_ref()).await {
        Ok(Some(usuario)) => usuario,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Usuario no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al desactivar usuario",
                "details": format!("{}", e)
            }));
        }
    };

    let mut active: UsuarioActiveModel = usuario.into();
    active.estado = Set("inactivo".to_string());

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Usuario desactivado correctamente"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al desactivar usuario",
            "details": format!("{}", e)
        })),
    }
}

pub fn usuarios_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/usuarios")
            .service(get_usuarios)
            .service(post_usuario)
            .service(get_usuario_by_id)
            .service(patch_usuario)
            .service(delete_usuario)
    );
}
