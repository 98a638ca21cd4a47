//! SQLite storage for the Ludus backend.
//!
//! Provides persistence for students, per-student metrics, the append-only
//! game-attempt log, and the game catalog.

mod db;
mod models;
mod queries;


pub use db::GameDatabase;
pub use ludus_core::db::DatabaseError;
pub use models::*;
