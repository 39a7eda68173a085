//! Migration system
//!
//! This module provides the infrastructure for database migrations:
//! - Migration trait definition and a ready-made per-model migration
//! - SchemaManager for schema operations
//! - Migration state tracking in the `berth_migrations` table
//! - The Migrator, which applies and rolls back registered migrations
//!
//! # Example
//!
//! ```rust,no_run
//! use berth::{DbError, Migration, SchemaManager};
//! use sea_query::{ColumnDef, Table};
//!
//! pub struct CreateUsersTable;
//!
//! impl Migration for CreateUsersTable {
//!     fn id(&self) -> &str {
//!         "create_users_table"
//!     }
//!
//!     fn up(&self, manager: &SchemaManager<'_>) -> Result<(), DbError> {
//!         let table = Table::create()
//!             .table("users")
//!             .col(ColumnDef::new("id").big_integer().not_null().auto_increment().primary_key())
//!             .col(ColumnDef::new("email").string().not_null())
//!             .to_owned();
//!         manager.create_table(table)
//!     }
//!
//!     fn down(&self, manager: &SchemaManager<'_>) -> Result<(), DbError> {
//!         let table = Table::drop().table("users").to_owned();
//!         manager.drop_table(table)
//!     }
//! }
//! ```

pub mod error;
pub mod migration;
pub mod migrator;
pub mod schema_manager;

pub use error::MigrationError;
pub use migration::{Migration, ModelMigration};
pub use migrator::{MigrationRecord, MigrationStatus, Migrator, STATE_TABLE};
pub use schema_manager::SchemaManager;
