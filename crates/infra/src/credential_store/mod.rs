//! `CredentialStore` adapters backed by real databases.
//!
//! The in-memory store lives next to the trait in `rbac-auth`.

pub mod postgres;

pub use postgres::PostgresCredentialStore;
