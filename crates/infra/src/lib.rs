//! Infrastructure layer: database pool wiring and the Postgres credential store.

pub mod credential_store;
pub mod db;

pub use credential_store::PostgresCredentialStore;
pub use db::connect;
