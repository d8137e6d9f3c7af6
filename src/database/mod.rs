pub mod manager;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{PgGramStore, PgUserStore};
