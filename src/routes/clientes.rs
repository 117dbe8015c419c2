use actix_web::{delete, get, patch, post, web, HttpResponse};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::{AuthUser, Rol, ROLES_STAFF};
use crate::models::clientes::{ActiveModel as ClienteActiveModel, Column as ClienteColumn, Entity as Clientes};
use crate::utils::password;

// DTO pour la création d'un client par le staff
// (le mot de passe est optionnel: un client créé en interne peut ne jamais se connecter)
#[derive(Deserialize, Validate)]
pub struct CreateClienteRequest {
    #[validate(length(min = 1))]
    pub nombre: String,
    #[validate(email)]
    pub correo: String,
    pub telefono: Option<String>,
    pub password: Option<String>,
    pub empresa: Option<String>,
    pub area: Option<String>,
    pub direccion: Option<String>,
    pub notas: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateClienteRequest {
    pub nombre: Option<String>,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub empresa: Option<String>,
    pub area: Option<String>,
    pub direccion: Option<String>,
    pub notas: Option<String>,
    pub activo: Option<bool>,
    pub password: Option<String>,
}

impl UpdateClienteRequest {
    fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.correo.is_none()
            && self.telefono.is_none()
            && self.empresa.is_none()
            && self.area.is_none()
            && self.direccion.is_none()
            && self.notas.is_none()
            && self.activo.is_none()
            && self.password.is_none()
    }
}

/// GET /clientes - Liste des clients (staff)
#[get("")]
pub async fn get_clientes(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    match Clientes::find().all(db.get_ref()).await {
        Ok(clientes) => HttpResponse::Ok().json(clientes),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al obtener clientes",
            "details": format!("{}", e)
        })),
    }
}

/// GET /clientes/{cliente_id} - Un client par id (staff)
#[get("/{cliente_id}")]
pub async fn get_cliente_by_id(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    let cliente_id = path.into_inner();

    match Clientes::find_by_id(cliente_id).one(db.get_ref()).await {
        Ok(Some(cliente)) => HttpResponse::Ok().json(cliente),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Cliente no encontrado"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al obtener cliente",
            "details": format!("{}", e)
        })),
    }
}

/// POST /clientes - Créer un client (staff)
#[post("")]
pub async fn post_cliente(
    auth_user: AuthUser,
    body: web::Json<CreateClienteRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 1. Correo unique
    match Clientes::find()
        .filter(ClienteColumn::Correo.eq(&body.correo))
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
                "error": "Error al crear cliente",
                "details": format!("{}", e)
            }));
        }
        _ => {}
    }

    // 2. Hasher le mot de passe s'il est fourni
    let password_hash = match body.password {
        Some(ref password) => match password::hash_password(password) {
            Ok(hash) => Some(hash),
            Err(_) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al crear cliente"
                }));
            }
        },
        None => None,
    };

    let nuevo = ClienteActiveModel {
        nombre: Set(body.nombre.clone()),
        correo: Set(body.correo.clone()),
        telefono: Set(body.telefono.clone()),
        password_hash: Set(password_hash),
        empresa: Set(body.empresa.clone()),
        area: Set(body.area.clone()),
        direccion: Set(body.direccion.clone()),
        notas: Set(body.notas.clone()),
        activo: Set(true),
        ..Default::default()
    };

    match nuevo.insert(db.get_ref()).await {
        Ok(cliente) => HttpResponse::Created().json(serde_json::json!({
            "message": "Cliente creado correctamente",
            "cliente_id": cliente.cliente_id
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al crear cliente",
            "details": format!("{}", e)
        })),
    }
}

/// PATCH /clientes/{cliente_id} - Mise à jour partielle (staff)
#[patch("/{cliente_id}")]
pub async fn patch_cliente(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateClienteRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    if body.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No se proporcionaron campos válidos para actualizar."
        }));
    }

    let cliente_id = path.into_inner();

    let cliente = match Clientes::find_by_id(cliente_id).one(db.get_ref()).await {
        Ok(Some(cliente)) => cliente,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Cliente no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al actualizar cliente",
                "details": format!("{}", e)
            }));
        }
    };

    let mut active: ClienteActiveModel = cliente.into();

    if let Some(ref nombre) = body.nombre {
        active.nombre = Set(nombre.clone());
    }
    if let Some(ref correo) = body.correo {
        active.correo = Set(correo.clone());
    }
    if let Some(ref telefono) = body.telefono {
        active.telefono = Set(Some(telefono.clone()));
    }
    if let Some(ref empresa) = body.empresa {
        active.empresa = Set(Some(empresa.clone()));
    }
    if let Some(ref area) = body.area {
        active.area = Set(Some(area.clone()));
    }
    if let Some(ref direccion) = body.direccion {
        active.direccion = Set(Some(direccion.clone()));
    }
    if let Some(ref notas) = body.notas {
        active.notas = Set(Some(notas.clone()));
    }
    if let Some(activo) = body.activo {
        active.activo = Set(activo);
    }
    if let Some(ref nuevo_password) = body.password {
        match password::hash_password(nuevo_password) {
            Ok(hash) => active.password_hash = Set(Some(hash)),
            Err(_) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al actualizar cliente"
                }));
            }
        }
    }

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Cliente actualizado correctamente"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al actualizar cliente",
            "details": format!("{}", e)
        })),
    }
}

/// DELETE /clientes/{cliente_id} - Désactivation logique (Admin)
#[delete("/{cliente_id}")]
pub async fn delete_cliente(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&[Rol::Admin]) {
        return resp;
    }

    let cliente_id = path.into_inner();

    let cliente = match Clientes::find_by_id(cliente_id).one(db.get_ref()).await {
        Ok(Some(cliente)) => cliente,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Cliente no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al desactivar cliente",
                "details": format!("{}", e)
            }));
        }
    };

    let mut active: ClienteActiveModel = cliente.into();
    active.activo = Set(false);

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Cliente desactivado correctamente"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al desactivar cliente",
            "details": format!("{}", e)
        })),
    }
}

pub fn clientes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clientes")
            .service(get_clientes)
            .service(post_cliente)
            .service(get_cliente_by_id)
            .service(patch_cliente)
            .service(delete_cliente)
    );
}
