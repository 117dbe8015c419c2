use sea_orm::*;

use crate::middleware::{AuthUser, Rol};
use crate::models::dto::{ConteoPorEstado, ConteoPorPrioridad, ResumenDashboard};
use crate::models::tickets;
use crate::services::ticket_service::TicketService;

/// Périmètre de tickets visibles dans le résumé, dérivé du rôle du caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alcance {
    Global,
    PorAgente(i32),
    PorCliente(i32),
    SinTickets, // Usuario sans fiche client: aucun ticket
}

pub struct DashboardService;

impl DashboardService {
    async fn alcance_para(
        db: &DatabaseConnection,
        auth: &AuthUser,
    ) -> Result<Alcance, DbErr> {
        match auth.rol {
            Rol::Admin | Rol::Supervisor => Ok(Alcance::Global),
            Rol::Agente => Ok(Alcance::PorAgente(auth.user_id)),
            Rol::Usuario => {
                let cliente = TicketService::cliente_por_correo(db, &auth.correo).await?;
                Ok(match cliente {
                    Some(cliente) => Alcance::PorCliente(cliente.cliente_id),
                    None => Alcance::SinTickets,
                })
            }
        }
    }

    fn aplicar_filtro(
        consulta: Select<tickets::Entity>,
        alcance: Alcance,
    ) -> Select<tickets::Entity> {
        match alcance {
            Alcance::Global | Alcance::SinTickets => consulta,
            Alcance::PorAgente(agente_id) => {
                consulta.filter(tickets::Column::AgenteId.eq(agente_id))
            }
            Alcance::PorCliente(cliente_id) => {
                consulta.filter(tickets::Column::ClienteId.eq(cliente_id))
            }
        }
    }

    /// Total + conteos par estado et par prioridad, sur le même filtre
    pub async fn resumen(
        db: &DatabaseConnection,
        auth: &AuthUser,
    ) -> Result<ResumenDashboard, DbErr> {
        let alcance = Self::alcance_para(db, auth).await?;

        if alcance == Alcance::SinTickets {
            return Ok(ResumenDashboard {
                total: 0,
                por_estado: vec![],
                por_prioridad: vec![],
            });
        }

        // 1. Total de tickets
        let total = Self::aplicar_filtro(tickets::Entity::find(), alcance)
            .count(db)
            .await?;

        // 2. Conteo par estado
        let por_estado = Self::aplicar_filtro(tickets::Entity::find(), alcance)
            .select_only()
            .column(tickets::Column::Estado)
            .column_as(tickets::Column::TicketId.count(), "cantidad")
            .group_by(tickets::Column::Estado)
            .into_model::<ConteoPorEstado>()
            .all(db)
            .await?;

        // 3. Conteo par prioridad
        let por_prioridad = Self::aplicar_filtro(tickets::Entity::find(), alcance)
            .select_only()
            .column(tickets::Column::Prioridad)
            .column_as(tickets::Column::TicketId.count(), "cantidad")
            .group_by(tickets::Column::Prioridad)
            .into_model::<ConteoPorPrioridad>()
            .all(db)
            .await?;

        Ok(ResumenDashboard {
            total,
            por_estado,
            por_prioridad,
        })
    }
}
