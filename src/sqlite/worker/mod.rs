//! Dedicated worker thread owning one pooled `SQLite` connection.
//!
//! rusqlite connections, transactions, and cursors cannot cross threads, so
//! a reserved connection lives on its own OS thread and the adapters talk
//! to it over a command channel. The worker serializes everything on the
//! connection, which is exactly the exclusivity the native resource has.

mod channel;
mod dispatcher;
mod manager;

pub(crate) use manager::SqliteWorker;
