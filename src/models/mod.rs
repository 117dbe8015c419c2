// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - usuarios : Personnel interne (Admin, Supervisor, Agente, Usuario)
//   - clientes : Clients finaux (auto-inscription ou créés par le staff)
//   - tickets : Tickets de support (numéro TCK-XXXX, cycle de vie par estado)
//   - comentarios : Commentaires du staff sur les tickets
//   - categorias : Catégories de tickets (référence en lecture seule)
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les password_hash sont marqués skip_serializing (jamais exposés)
//   - Usuarios et Clientes ne sont jamais supprimés physiquement
//     (estado = 'inactivo' / activo = false)
//
// ============================================================================

pub mod health;
pub mod usuarios;
pub mod clientes;
pub mod tickets;
pub mod comentarios;
pub mod categorias;
pub mod dto;
