//pour les réponses structurées
use sea_orm::FromQueryResult;
use serde::Serialize;

// Résumé du dashboard: 3 requêtes partageant le même filtre dérivé du rôle
#[derive(Debug, Serialize)]
pub struct ResumenDashboard {
    pub total: u64,
    pub por_estado: Vec<ConteoPorEstado>,
    pub por_prioridad: Vec<ConteoPorPrioridad>,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct ConteoPorEstado {
    pub estado: String,
    pub cantidad: i64,
}

#[derive(Debug, Serialize, FromQueryResult)]
pub struct ConteoPorPrioridad {
    pub prioridad: String,
    pub cantidad: i64,
}
