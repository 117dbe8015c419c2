use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::{AuthUser, Rol};
use crate::models::tickets::{ActiveModel as TicketActiveModel, Column as TicketColumn, Entity as Tickets};
use crate::services::ticket_service::{NuevoTicket, TicketService};

// DTO de création: cliente_id est requis pour le staff et ignoré pour le
// rôle Usuario (sa fiche client est résolue depuis son correo)
#[derive(Deserialize, Validate)]
pub struct CreateTicketRequest {
    pub cliente_id: Option<i32>,
    pub agente_id: Option<i32>,
    pub categoria_id: i32,
    pub prioridad: String,
    #[validate(length(min = 1))]
    pub descripcion: String,
}

// DTO de mise à jour partielle
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UpdateTicketRequest {
    pub agente_id: Option<i32>,
    pub categoria_id: Option<i32>,
    pub prioridad: Option<String>,
    pub descripcion: Option<String>,
    pub estado: Option<String>,
}

impl UpdateTicketRequest {
    fn is_empty(&self) -> bool {
        self.agente_id.is_none()
            && self.categoria_id.is_none()
            && self.prioridad.is_none()
            && self.descripcion.is_none()
            && self.estado.is_none()
    }

    /// Restreint la mise à jour aux champs autorisés pour le rôle Usuario.
    /// agente_id et estado sont écartés silencieusement, pas rejetés.
    fn filtrado_para_usuario(&self) -> UpdateTicketRequest {
        UpdateTicketRequest {
            agente_id: None,
            categoria_id: self.categoria_id,
            prioridad: self.prioridad.clone(),
            descripcion: self.descripcion.clone(),
            estado: None,
        }
    }
}

/// GET /tickets - Tickets visibles selon le rôle
/// Staff: tous; Usuario: uniquement ceux de sa fiche client (liste vide sinon)
#[get("")]
pub async fn get_tickets(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let consulta = if auth_user.rol == Rol::Usuario {
        let cliente = match TicketService::cliente_por_correo(db.get_ref(), &auth_user.correo).await {
            Ok(cliente) => cliente,
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al obtener tickets",
                    "details": format!("{}", e)
                }));
            }
        };

        match cliente {
            Some(cliente) => Tickets::find().filter(TicketColumn::ClienteId.eq(cliente.cliente_id)),
            // Usuario sans fiche client: aucun ticket
            None => return HttpResponse::Ok().json(Vec::<crate::models::tickets::Model>::new()),
        }
    } else {
        Tickets::find()
    };

    match consulta.all(db.get_ref()).await {
        Ok(tickets) => HttpResponse::Ok().json(tickets),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al obtener tickets",
            "details": format!("{}", e)
        })),
    }
}

/// GET /tickets/{ticket_id} - Un ticket par id, avec contrôle de propriété
#[get("/{ticket_id}")]
pub async fn get_ticket_by_id(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let ticket_id = path.into_inner();

    let ticket = match Tickets::find_by_id(ticket_id).one(db.get_ref()).await {
        Ok(Some(ticket)) => ticket,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Ticket no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al obtener el ticket",
                "details": format!("{}", e)
            }));
        }
    };

    if auth_user.rol == Rol::Usuario {
        match TicketService::es_propietario(db.get_ref(), &ticket, &auth_user.correo).await {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "No tienes permisos para esta acción"
                }));
            }
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al obtener el ticket",
                    "details": format!("{}", e)
                }));
            }
        }
    }

    HttpResponse::Ok().json(ticket)
}

/// POST /tickets - Créer un ticket
#[post("")]
pub async fn create_ticket(
    auth_user: AuthUser,
    body: web::Json<CreateTicketRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 1. Valider la priorité
    if !TicketService::prioridad_valida(&body.prioridad) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Prioridad inválida. Debe ser: Baja, Media o Alta"
        }));
    }

    // 2. La catégorie référencée doit exister
    match TicketService::categoria_existe(db.get_ref(), body.categoria_id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "La categoría indicada no existe"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al crear ticket",
                "details": format!("{}", e)
            }));
        }
    }

    // 3. L'agent assigné (optionnel) doit exister avec un rôle de staff
    if let Some(agente_id) = body.agente_id {
        match TicketService::agente_valido(db.get_ref(), agente_id).await {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "El agente asignado no es válido"
                }));
            }
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al crear ticket",
                    "details": format!("{}", e)
                }));
            }
        }
    }

    // 4. Résoudre le client: le staff doit fournir cliente_id, le rôle
    //    Usuario crée ses tickets sur sa propre fiche
    let cliente_id = if auth_user.rol == Rol::Usuario {
        match TicketService::resolver_o_crear_cliente(db.get_ref(), &auth_user).await {
            Ok(cliente) => cliente.cliente_id,
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al crear ticket",
                    "details": format!("{}", e)
                }));
            }
        }
    } else {
        match body.cliente_id {
            Some(cliente_id) => cliente_id,
            None => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "cliente_id es requerido"
                }));
            }
        }
    };

    // 5. Créer le ticket avec son numéro séquentiel
    let datos = NuevoTicket {
        cliente_id,
        agente_id: body.agente_id,
        categoria_id: body.categoria_id,
        prioridad: body.prioridad.clone(),
        descripcion: body.descripcion.clone(),
    };

    match TicketService::crear_ticket(db.get_ref(), datos).await {
        Ok(ticket) => HttpResponse::Created().json(serde_json::json!({
            "message": "Ticket creado",
            "ticket_id": ticket.ticket_id,
            "numero_ticket": ticket.numero_ticket
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al crear ticket",
            "details": format!("{}", e)
        })),
    }
}

/// PATCH /tickets/{ticket_id} - Mise à jour partielle
/// Staff: tous les champs; Usuario: categoria/prioridad/descripcion sur ses
/// propres tickets, les autres champs soumis sont écartés silencieusement
#[patch("/{ticket_id}")]
pub async fn update_ticket(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateTicketRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // Aucun champ reconnu → 400, aucune écriture
    if body.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No se proporcionaron campos para actualizar."
        }));
    }

    if let Some(ref prioridad) = body.prioridad {
        if !TicketService::prioridad_valida(prioridad) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Prioridad inválida. Debe ser: Baja, Media o Alta"
            }));
        }
    }

    let ticket_id = path.into_inner();

    let ticket = match Tickets::find_by_id(ticket_id).one(db.get_ref()).await {
        Ok(Some(ticket)) => ticket,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Ticket no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al actualizar ticket",
                "details": format!("{}", e)
            }));
        }
    };

    // Contrôle de propriété puis filtre des champs pour le rôle Usuario
    let cambios = if auth_user.rol == Rol::Usuario {
        match TicketService::es_propietario(db.get_ref(), &ticket, &auth_user.correo).await {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "No tienes permisos para esta acción"
                }));
            }
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al actualizar ticket",
                    "details": format!("{}", e)
                }));
            }
        }
        body.filtrado_para_usuario()
    } else {
        body.into_inner()
    };

    // Tous les champs soumis ont été filtrés: succès sans écriture
    if cambios.is_empty() {
        return HttpResponse::Ok().json(serde_json::json!({
            "message": "Ticket actualizado correctamente"
        }));
    }

    // Valider les références avant d'écrire
    if let Some(categoria_id) = cambios.categoria_id {
        match TicketService::categoria_existe(db.get_ref(), categoria_id).await {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "La categoría indicada no existe"
                }));
            }
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al actualizar ticket",
                    "details": format!("{}", e)
                }));
            }
        }
    }

    if let Some(agente_id) = cambios.agente_id {
        match TicketService::agente_valido(db.get_ref(), agente_id).await {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "El agente asignado no es válido"
                }));
            }
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al actualizar ticket",
                    "details": format!("{}", e)
                }));
            }
        }
    }

    let mut active: TicketActiveModel = ticket.into();

    if let Some(agente_id) = cambios.agente_id {
        active.agente_id = Set(Some(agente_id));
    }
    if let Some(categoria_id) = cambios.categoria_id {
        active.categoria_id = Set(categoria_id);
    }
    if let Some(ref prioridad) = cambios.prioridad {
        active.prioridad = Set(prioridad.clone());
    }
    if let Some(ref descripcion) = cambios.descripcion {
        active.descripcion = Set(descripcion.clone());
    }
    if let Some(ref estado) = cambios.estado {
        active.estado = Set(estado.clone());
    }
    active.fecha_actualizacion = Set(Utc::now().into());

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Ticket actualizado correctamente"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al actualizar ticket",
            "details": format!("{}", e)
        })),
    }
}

/// DELETE /tickets/{ticket_id} - Annulation logique
/// Jamais de suppression physique: estado passe à 'Cancelado'
#[delete("/{ticket_id}")]
pub async fn cancel_ticket(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(resp) = auth_user.require_role(&[Rol::Admin, Rol::Supervisor, Rol::Usuario]) {
        return resp;
    }

    let ticket_id = path.into_inner();

    let ticket = match Tickets::find_by_id(ticket_id).one(db.get_ref()).await {
        Ok(Some(ticket)) => ticket,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Ticket no encontrado"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error al cancelar ticket",
                "details": format!("{}", e)
            }));
        }
    };

    if auth_user.rol == Rol::Usuario {
        match TicketService::es_propietario(db.get_ref(), &ticket, &auth_user.correo).await {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "No tienes permisos para esta acción"
                }));
            }
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Error al cancelar ticket",
                    "details": format!("{}", e)
                }));
            }
        }
    }

    let mut active: TicketActiveModel = ticket.into();
    active.estado = Set("Cancelado".to_string());
    active.fecha_actualizacion = Set(Utc::now().into());

    match active.update(db.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Ticket cancelado correctamente"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al cancelar ticket",
            "details": format!("{}", e)
        })),
    }
}

pub fn tickets_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tickets")
            .service(get_tickets)
            .service(create_ticket)
            .service(get_ticket_by_id)
            .service(update_ticket)
            .service(cancel_ticket)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_vacio() {
        let body = UpdateTicketRequest::default();
        assert!(body.is_empty());

        let body = UpdateTicketRequest {
            descripcion: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!body.is_empty());
    }

    #[test]
    fn test_filtro_usuario_descarta_estado_y_agente() {
        let body = UpdateTicketRequest {
            agente_id: Some(3),
            categoria_id: Some(2),
            prioridad: Some("Alta".to_string()),
            descripcion: Some("sigue fallando".to_string()),
            estado: Some("Cancelado".to_string()),
        };

        let filtrado = body.filtrado_para_usuario();

        assert_eq!(filtrado.agente_id, None);
        assert_eq!(filtrado.estado, None);
        assert_eq!(filtrado.categoria_id, Some(2));
        assert_eq!(filtrado.prioridad, Some("Alta".to_string()));
        assert_eq!(filtrado.descripcion, Some("sigue fallando".to_string()));
    }

    #[test]
    fn test_filtro_usuario_puede_vaciar_la_peticion() {
        // Un body qui ne contient que des champs interdits pour Usuario
        // devient vide après filtrage (succès sans écriture)
        let body = UpdateTicketRequest {
            estado: Some("Cancelado".to_string()),
            ..Default::default()
        };

        assert!(!body.is_empty());
        assert!(body.filtrado_para_usuario().is_empty());
    }
}
