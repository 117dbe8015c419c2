use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub ticket_id: i32,

    // Numéro lisible au format TCK-0001, strictement croissant
    // La contrainte UNIQUE couvre la génération concurrente (voir TicketService)
    #[sea_orm(unique)]
    pub numero_ticket: String,

    pub cliente_id: i32,
    pub agente_id: Option<i32>, // NULL tant que le ticket n'est pas assigné
    pub categoria_id: i32,
    pub prioridad: String, // "Baja", "Media" ou "Alta"
    pub descripcion: String,
    pub estado: String, // libre ("Nuevo", "InProgreso", ...) sauf "Cancelado" = soft-delete
    pub fecha_creacion: DateTimeWithTimeZone,
    pub fecha_actualizacion: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clientes::Entity",
        from = "Column::ClienteId",
        to = "super::clientes::Column::ClienteId"
    )]
    Cliente,

    #[sea_orm(
        belongs_to = "super::usuarios::Entity",
        from = "Column::AgenteId",
        to = "super::usuarios::Column::UsuarioId"
    )]
    Agente,

    #[sea_orm(
        belongs_to = "super::categorias::Entity",
        from = "Column::CategoriaId",
        to = "super::categorias::Column::CategoriaId"
    )]
    Categoria,

    #[sea_orm(has_many = "super::comentarios::Entity")]
    Comentarios,
}

impl Related<super::clientes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cliente.def()
    }
}

impl Related<super::usuarios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agente.def()
    }
}

impl Related<super::categorias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categoria.def()
    }
}

impl Related<super::comentarios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comentarios.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
