use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::middleware::AuthUser;
use crate::services::dashboard_service::DashboardService;

/// GET /dashboard/resumen - Statistiques de tickets filtrées par rôle
/// (Admin/Supervisor: global, Agente: assignés, Usuario: sa fiche client)
#[get("/resumen")]
pub async fn get_resumen(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match DashboardService::resumen(db.get_ref(), &auth_user).await {
        Ok(resumen) => HttpResponse::Ok().json(resumen),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Error al obtener estadísticas del dashboard",
            "details": format!("{}", e)
        })),
    }
}

pub fn dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").service(get_resumen));
}
