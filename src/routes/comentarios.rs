use actix_web::{get, patch, post, web, HttpResponse};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::{AuthUser, ROLES_STAFF};
use crate::models::comentarios::{ActiveModel as ComentarioActiveModel, Column as ComentarioColumn, Entity as Comentarios};
use crate::models::tickets::Entity as Tickets;

// DTO de création: l'auteur est le caller authentifié, pas un champ du body
#[derive(Deserialize, Validate)]
pub struct CreateComentarioRequest {
    pub ticket_id: i32,
    #[validate(length(min = 1))]
    pub texto: String,
}

#[derive(Deserialize, Validate)]
pub struct UpdateComentarioRequest {
    #[validate(length(min = 1))]
    pub texto: String,
}

/// GET /comentarios - Tous les commentaires (staff)
#[get("")]
pub async fn obtener_comentarios(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    match Comentarios::find().all(db.get_ref()).await {
        Ok(comentarios) => HttpResponse::Ok().json(comentarios),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al obtener comentarios",
            "details": format!("{}", e)
        })),
    }
}

/// GET /comentarios/ticket/{ticket_id} - Commentaires d'un ticket,
/// du plus récent au plus ancien (tableau vide si aucun)
#[get("/ticket/{ticket_id}")]
pub async fn obtener_comentarios_por_ticket(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    let ticket_id = path.into_inner();

    match Comentarios::find()
        .filter(ComentarioColumn::TicketId.eq(ticket_id))
        .order_by_desc(ComentarioColumn::FechaCreacion)
        .all(db.get_ref())
        .await
    {
        Ok(comentarios) => HttpResponse::Ok().json(comentarios),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al obtener comentarios por ticket",
            "details": format!("{}", e)
        })),
    }
}

/// POST /comentarios - Créer un commentaire (staff)
#[post("")]
pub async fn crear_comentario(
    auth_user: AuthUser,
    body: web::Json<CreateComentarioRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // Le ticket commenté doit exister
    match Tickets::find_by_id(body.ticket_id).one(db.get_ref()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Ticket no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al crear comentario",
                "details": format!("{}", e)
            }));
        }
    }

    let nuevo = ComentarioActiveModel {
        ticket_id: Set(body.ticket_id),
        usuario_id: Set(auth_user.user_id),
        texto: Set(body.texto.clone()),
        fecha_creacion: Set(Utc::now().into()),
        ..Default::default()
    };

    match nuevo.insert(db.get_ref()).await {
        Ok(comentario) => HttpResponse::Created().json(serde_json::json!({
            "mensaje": "Comentario creado",
            "id": comentario.comentario_id
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al crear comentario",
            "details": format!("{}", e)
        })),
    }
}

/// PATCH /comentarios/{comentario_id} - Éditer le texte (staff)
/// Pas de route DELETE: les commentaires ne se suppriment jamais
#[patch("/{comentario_id}")]
pub async fn editar_comentario(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateComentarioRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&ROLES_STAFF) {
        return resp;
    }

    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    let comentario_id = path.into_inner();

    let comentario = match Comentarios::find_by_id(comentario_id).one(db.get_ref()).await {
        Ok(Some(comentario)) => comentario,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Comentario no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al editar comentario",
                "details": format!("{}", e)
            }));
        }
    };

    let mut active: ComentarioActiveModel = comentario.into();
    active.texto = Set(body.texto.clone());

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "mensaje": "Comentario actualizado"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al editar comentario",
            "details": format!("{}", e)
        })),
    }
}

pub fn comentarios_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comentarios")
            .service(obtener_comentarios)
            .service(crear_comentario)
            .service(obtener_comentarios_por_ticket)
            .service(editar_comentario)
    );
}
