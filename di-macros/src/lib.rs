//! Compile-time dependency injection macros for academe.
//!
//! Two derives cooperate:
//! - `#[derive(Context)]` on the application context makes each field
//!   extractable by type
//! - `#[derive(FromContext)]` on a consumer (repository, cache, ...) resolves
//!   every field from that context
//!
//! Generated code references `crate::FromRef` and `crate::context::Context`,
//! so the consuming crate must re-export the `FromRef` trait at its root and
//! define its context at `context::Context`.

use proc_macro::TokenStream;

mod expand;

/// Derive macro for the application context.
///
/// Generates a `FromRef` implementation for each field type, so the field can
/// be pulled out of the context by type alone. Every field must be `Clone`;
/// extraction clones the handle, never the underlying resource.
///
/// # Example
///
/// ```ignore
/// #[derive(Context, Clone)]
/// pub struct Context {
///     pub graph: Arc<Graph>,
///     pub config: Arc<Config>,
/// }
///
/// // Generated:
/// // impl FromRef<Context> for Arc<Graph> { ... }
/// // impl FromRef<Context> for Arc<Config> { ... }
/// ```
///
/// Field types must be distinct, otherwise the generated impls conflict.
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    expand::context(input)
}

/// Derive macro for types assembled out of context fields.
///
/// Generates `FromRef<crate::context::Context>` for the struct, resolving
/// each field with `FromRef::from_ref` on the context.
///
/// # Example
///
/// ```ignore
/// #[derive(FromContext, Clone)]
/// pub struct GraphRepository {
///     graph: Arc<Graph>,    // resolved via <Arc<Graph>>::from_ref(ctx)
///     config: Arc<Config>,  // resolved via <Arc<Config>>::from_ref(ctx)
/// }
/// ```
#[proc_macro_derive(FromContext)]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    expand::from_context(input)
}
