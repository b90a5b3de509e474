//! academe - Polyglot persistence facade over the Academic World dataset.
//!
//! Federates three stores behind one interface: a Neo4j graph (faculty,
//! institutes, keywords and their relationships), a PostgreSQL database
//! (publications with citation counts), and a MongoDB collection feeding a
//! file-backed materialized-view cache for the expensive aggregates.

pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod docstore;
pub mod error;
pub mod facade;
pub mod geocode;
pub mod models;
pub mod repositories;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;
