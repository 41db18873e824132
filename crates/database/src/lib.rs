//! # Rollcall Database Crate
//!
//! This crate is the application-specific interface to the document store that holds
//! students, courses and attendance records.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All store-specific logic lives here. The web layer only sees typed
//!   records and `DbError`.
//! - **Pluggable store:** `DbRepository` is generic over the `DocumentStore` trait.
//!   `MongoStore` talks to MongoDB; `InMemoryStore` keeps everything in process.
//! - **Application-level integrity:** Uniqueness and references are checked by explicit
//!   lookups before writes, not by indexes or foreign keys.
//!
//! ## Public API
//!
//! - `connect`: Establishes the MongoDB client and returns a `MongoStore`.
//! - `DbRepository`: Student, course and attendance operations.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use repository::DbRepository;
pub use store::{Collection, DocumentStore, InMemoryStore, MongoStore, UpsertOutcome};
