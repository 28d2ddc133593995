//! Database module: models, schema and the persistence contract.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `store.rs`: `Store` / `StoreTx` traits the services are written against
//! - `sqlite.rs`: SQLite implementation of the store traits
//! - `page.rs`: offset paging types

pub mod models;
pub mod page;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use models::{Account, Card, CardDraft, CardStatus, Folder};
pub use page::{Page, PageSpec};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqliteStore, SqliteTx};
pub use store::{Store, StoreError, StoreResult, StoreTx};
