pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::DirectoryError;
pub use router::{admin_routes, directory_routes};
pub use services::admin::AdminDirectoryService;
pub use services::directory::DirectoryService;
