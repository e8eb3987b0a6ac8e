pub mod accounts;
pub mod auth;
pub mod directory;
pub mod error;
pub mod records;
pub mod scheduling;
