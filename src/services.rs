pub mod auth;
pub mod dashboard_service;
pub mod fallback;
pub mod inventory_service;
pub mod lifecycle;
pub mod operation_service;
pub mod payment_service;
pub mod wallet_service;
