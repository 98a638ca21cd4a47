//! Ludus Backend Server Library
//!
//! Core functionality for the Ludus API:
//! - SQLite storage for students, metrics, attempts, and the game catalog
//! - Shared-secret gate for mutating student endpoints
//! - In-memory tracker of logged-in students
//! - HTTP services (student accounts, gameplay metrics)

pub mod auth;
pub mod server;
pub mod sessions;
pub mod storage;
