//! Database module: the drink entity and its SQLite-backed store.
//!
//! Layout:
//! - `models.rs`: the drink record, its ingredients and the two views
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: pool wrapper with the CRUD operations

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Drink, Ingredient, LongDrink, ShortDrink};
pub use schema::SQLITE_INIT;
pub use sqlite::{DrinkStore, SqlitePool};
