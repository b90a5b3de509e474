//! Dependency injection infrastructure.
//!
//! Store handles live in one [`crate::context::Context`]; repositories and the
//! aggregate cache declare the handles they need as fields and derive
//! `FromContext`. Resolution happens at compile time, there is no registry.
//!
//! - `FromRef<T>`: extract a value from a reference to `T`
//! - `#[derive(Context)]`: makes each field of a struct extractable via `FromRef`
//! - `#[derive(FromContext)]`: builds a struct by resolving every field
//!
//! # Example
//!
//! ```ignore
//! use crate::di::{Context, FromContext, FromRef};
//!
//! #[derive(Context, Clone)]
//! pub struct Context {
//!     pub graph: Arc<Graph>,
//!     pub config: Arc<Config>,
//! }
//!
//! #[derive(FromContext, Clone)]
//! pub struct GraphRepository {
//!     graph: Arc<Graph>,  // resolved via FromRef<Context>
//!     config: Arc<Config>,
//! }
//!
//! let repo = GraphRepository::from_ref(&ctx);
//! ```

/// Trait for extracting a value from a reference to another type.
///
/// Extraction clones a handle (`Arc`, pool, client), never a resource.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Blanket implementation: any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

// Re-export derive macros
pub use di_macros::{Context, FromContext};
