pub mod auth;
pub mod dashboard;
pub mod inventory;
pub mod operations;
pub mod pos;
pub mod wallet;
