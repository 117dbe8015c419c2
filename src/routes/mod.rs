pub mod auth;
pub mod categorias;
pub mod clientes;
pub mod comentarios;
pub mod dashboard;
pub mod health;
pub mod tickets;
pub mod usuarios;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_check)
        .configure(auth::auth_routes)
        .configure(usuarios::usuarios_routes)
        .configure(clientes::clientes_routes)
        .configure(tickets::tickets_routes)
        .configure(comentarios::comentarios_routes)
        .configure(categorias::categorias_routes)
        .configure(dashboard::dashboard_routes);
}
