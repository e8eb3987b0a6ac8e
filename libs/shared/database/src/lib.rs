pub mod error;
pub mod memory;
pub mod store;
pub mod supabase;
pub mod supabase_store;

pub use error::{StoreError, StoreResult};
pub use memory::{FailPoint, MemoryStore};
pub use store::ClinicStore;
pub use supabase::SupabaseClient;
pub use supabase_store::SupabaseStore;
