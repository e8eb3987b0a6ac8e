pub mod admin;
pub mod directory;
