use sea_orm::*;
use chrono::Utc;
use std::str::FromStr;

use crate::middleware::{AuthUser, Rol};
use crate::models::{categorias, clientes, tickets, usuarios};

const PREFIJO_NUMERO: &str = "TCK-";
const ESTADO_INICIAL: &str = "Nuevo";

// Nombre de tentatives d'insertion quand deux créations concurrentes
// calculent le même numéro (la contrainte UNIQUE tranche)
const MAX_INTENTOS_NUMERO: usize = 3;

pub const PRIORIDADES_VALIDAS: [&str; 3] = ["Baja", "Media", "Alta"];

/// Données validées pour la création d'un ticket
pub struct NuevoTicket {
    pub cliente_id: i32,
    pub agente_id: Option<i32>,
    pub categoria_id: i32,
    pub prioridad: String,
    pub descripcion: String,
}

pub struct TicketService;

impl TicketService {
    /// Extrait le suffixe numérique d'un numéro au format TCK-0001
    fn parse_numero(numero: &str) -> Option<u32> {
        numero.strip_prefix(PREFIJO_NUMERO)?.parse::<u32>().ok()
    }

    /// Formate un numéro de ticket, zéro-paddé sur 4 chiffres minimum
    fn formato_numero(n: u32) -> String {
        format!("{}{:04}", PREFIJO_NUMERO, n)
    }

    /// Calcule le numéro suivant à partir du dernier numéro inséré
    /// (1 si la table est vide ou si le dernier numéro est illisible)
    fn siguiente_numero(ultimo: Option<&str>) -> u32 {
        ultimo
            .and_then(Self::parse_numero)
            .map(|n| n + 1)
            .unwrap_or(1)
    }

    pub fn prioridad_valida(prioridad: &str) -> bool {
        PRIORIDADES_VALIDAS.contains(&prioridad)
    }

    /// Dernier numero_ticket inséré, ordonné par ticket_id décroissant
    /// (le numéro dérive du dernier numéro, pas de l'auto-increment)
    async fn ultimo_numero(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
        let ultimo = tickets::Entity::find()
            .order_by_desc(tickets::Column::TicketId)
            .one(db)
            .await?;

        Ok(ultimo.map(|t| t.numero_ticket))
    }

    /// Crée un ticket avec son numéro séquentiel
    ///
    /// La séquence lecture-calcul-insertion peut entrer en course avec une
    /// autre création; la contrainte UNIQUE sur numero_ticket rejette alors
    /// le doublon et on relit le dernier numéro, au plus MAX_INTENTOS_NUMERO
    /// fois.
    pub async fn crear_ticket(
        db: &DatabaseConnection,
        datos: NuevoTicket,
    ) -> Result<tickets::Model, DbErr> {
        for intento in 0..MAX_INTENTOS_NUMERO {
            let ultimo = Self::ultimo_numero(db).await?;
            let numero = Self::formato_numero(Self::siguiente_numero(ultimo.as_deref()));
            let ahora = Utc::now().into();

            let nuevo = tickets::ActiveModel {
                numero_ticket: Set(numero),
                cliente_id: Set(datos.cliente_id),
                agente_id: Set(datos.agente_id),
                categoria_id: Set(datos.categoria_id),
                prioridad: Set(datos.prioridad.clone()),
                descripcion: Set(datos.descripcion.clone()),
                estado: Set(ESTADO_INICIAL.to_string()),
                fecha_creacion: Set(ahora),
                fecha_actualizacion: Set(ahora),
                ..Default::default()
            };

            match nuevo.insert(db).await {
                Ok(ticket) => return Ok(ticket),
                Err(err) => {
                    let es_duplicado = matches!(
                        err.sql_err(),
                        Some(SqlErr::UniqueConstraintViolation(_))
                    );
                    if !es_duplicado || intento + 1 == MAX_INTENTOS_NUMERO {
                        return Err(err);
                    }
                    // numéro pris par une création concurrente: on relit et on réessaie
                }
            }
        }

        Err(DbErr::Custom(
            "No se pudo generar un número de ticket único".to_string(),
        ))
    }

    /// Cherche le client correspondant à une adresse correo
    pub async fn cliente_por_correo(
        db: &DatabaseConnection,
        correo: &str,
    ) -> Result<Option<clientes::Model>, DbErr> {
        clientes::Entity::find()
            .filter(clientes::Column::Correo.eq(correo))
            .one(db)
            .await
    }

    /// Résout le client du caller avec rôle Usuario, en le créant depuis
    /// son profil usuario si aucune fiche client n'existe encore
    pub async fn resolver_o_crear_cliente(
        db: &DatabaseConnection,
        auth: &AuthUser,
    ) -> Result<clientes::Model, DbErr> {
        if let Some(cliente) = Self::cliente_por_correo(db, &auth.correo).await? {
            return Ok(cliente);
        }

        // Profil usuario du caller (absent si le compte vit dans clientes)
        let perfil = usuarios::Entity::find()
            .filter(usuarios::Column::Correo.eq(&auth.correo))
            .one(db)
            .await?;

        let (nombre, telefono) = match perfil {
            Some(usuario) => (usuario.nombre_completo, usuario.telefono),
            None => (auth.correo.clone(), None),
        };

        let nuevo = clientes::ActiveModel {
            nombre: Set(nombre),
            correo: Set(auth.correo.clone()),
            telefono: Set(telefono),
            password_hash: Set(None),
            empresa: Set(None),
            area: Set(None),
            direccion: Set(None),
            notas: Set(None),
            activo: Set(true),
            ..Default::default()
        };

        nuevo.insert(db).await
    }

    /// Vérifie que la catégorie référencée existe
    pub async fn categoria_existe(
        db: &DatabaseConnection,
        categoria_id: i32,
    ) -> Result<bool, DbErr> {
        let categoria = categorias::Entity::find_by_id(categoria_id).one(db).await?;
        Ok(categoria.is_some())
    }

    /// Vérifie que l'agent assigné existe et a un rôle de staff
    pub async fn agente_valido(
        db: &DatabaseConnection,
        agente_id: i32,
    ) -> Result<bool, DbErr> {
        let agente = usuarios::Entity::find_by_id(agente_id).one(db).await?;

        Ok(match agente {
            Some(usuario) => Rol::from_str(&usuario.rol)
                .map(|rol| rol.is_staff())
                .unwrap_or(false),
            None => false,
        })
    }

    /// Le ticket appartient-il au client résolu par ce correo?
    pub async fn es_propietario(
        db: &DatabaseConnection,
        ticket: &tickets::Model,
        correo: &str,
    ) -> Result<bool, DbErr> {
        match Self::cliente_por_correo(db, correo).await? {
            Some(cliente) => Ok(cliente.cliente_id == ticket.cliente_id),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numero() {
        assert_eq!(TicketService::parse_numero("TCK-0001"), Some(1));
        assert_eq!(TicketService::parse_numero("TCK-0042"), Some(42));
        assert_eq!(TicketService::parse_numero("TCK-10000"), Some(10000));
        assert_eq!(TicketService::parse_numero("TCK-"), None);
        assert_eq!(TicketService::parse_numero("TK-0001"), None);
        assert_eq!(TicketService::parse_numero("TCK-00x1"), None);
    }

    #[test]
    fn test_formato_numero() {
        assert_eq!(TicketService::formato_numero(1), "TCK-0001");
        assert_eq!(TicketService::formato_numero(42), "TCK-0042");
        assert_eq!(TicketService::formato_numero(9999), "TCK-9999");
        // au-delà de 4 chiffres le numéro s'allonge sans tronquer
        assert_eq!(TicketService::formato_numero(10000), "TCK-10000");
    }

    #[test]
    fn test_siguiente_numero() {
        assert_eq!(TicketService::siguiente_numero(None), 1);
        assert_eq!(TicketService::siguiente_numero(Some("TCK-0041")), 42);
        assert_eq!(TicketService::siguiente_numero(Some("TCK-9999")), 10000);
        // dernier numéro illisible: la séquence repart à 1, la contrainte
        // UNIQUE + retry absorbe toute collision
        assert_eq!(TicketService::siguiente_numero(Some("garbage")), 1);
    }

    #[test]
    fn test_secuencia_estrictamente_creciente() {
        let mut ultimo: Option<String> = None;
        for esperado in 1..=5 {
            let n = TicketService::siguiente_numero(ultimo.as_deref());
            assert_eq!(n, esperado);
            ultimo = Some(TicketService::formato_numero(n));
        }
        assert_eq!(ultimo.unwrap(), "TCK-0005");
    }

    #[test]
    fn test_prioridad_valida() {
        assert!(TicketService::prioridad_valida("Baja"));
        assert!(TicketService::prioridad_valida("Media"));
        assert!(TicketService::prioridad_valida("Alta"));
        assert!(!TicketService::prioridad_valida("Urgente"));
        assert!(!TicketService::prioridad_valida("alta"));
    }
}
