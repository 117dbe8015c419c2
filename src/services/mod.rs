pub mod dashboard_service;
pub mod ticket_service;
