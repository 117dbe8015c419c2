use actix_web::{get, web, HttpResponse};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::middleware::AuthUser;
use crate::models::categorias::Entity as Categorias;

/// GET /categorias - Liste des catégories (référence en lecture seule)
#[get("")]
pub async fn get_categorias(
    _auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match Categorias::find().all(db.get_ref()).await {
        Ok(categorias) => HttpResponse::Ok().json(categorias),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al obtener categorías",
            "details": format!("{}", e)
        })),
    }
}

pub fn categorias_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/categorias").service(get_categorias));
}
