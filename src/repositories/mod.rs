//! Data access layer, one repository per backing store.
//!
//! Repositories translate domain queries into store-specific query
//! languages, using the `FromContext` derive macro for dependency injection.

mod graph;
mod relational;

pub use graph::GraphRepository;
pub use relational::RelationalRepository;
