// Database service module
// SQLite connection and schema for the local cache

mod connection;
mod schema;

pub use connection::Database;
