pub mod initdb;
pub mod migrate_and_serve;
pub mod project;
pub mod serve;

pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use project::{project, OutputFormat};
pub use serve::serve;
