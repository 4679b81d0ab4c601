// SQLite backend - the concrete delegating implementation of the facade
// traits over rusqlite + deadpool-sqlite.
//
// - config: pool options and construction
// - params: value conversion between facade and SQLite types
// - query: synchronous statement execution and result extraction
// - worker: dedicated thread owning a reserved connection
// - database / connection / transaction / prepared: the entity adapters

mod config;
mod connection;
mod database;
mod params;
mod prepared;
mod query;
mod transaction;
mod worker;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use connection::SqliteConnection;
pub use database::SqliteDatabase;
pub use prepared::SqliteStatement;
pub use transaction::SqliteTransaction;
