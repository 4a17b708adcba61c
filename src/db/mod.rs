//! Diesel table definitions and row types. `schema.rs` is the table surface;
//! `models.rs` turns `crate::schema` records into rows right before a batch
//! or upsert is executed.

pub mod models;
pub mod schema;

pub use models::*;

use diesel_migrations::{embed_migrations, EmbeddedMigrations};

/// The table surface from spec.md §6, embedded so integration tests can
/// stand up a throwaway schema against `TONDB_TEST_DATABASE_URL` without a
/// separate migration-running step. Not used by `Store` itself — production
/// schema migrations are out of scope (spec.md §1).
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
