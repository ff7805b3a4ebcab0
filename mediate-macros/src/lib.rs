//! Procedural macros for the mediate framework.
//!
//! - `#[derive(Operation)]` - implements `mediate::Operation` from an
//!   `#[operation(...)]` attribute.

use proc_macro::TokenStream;

mod operation;

/// Derive macro for implementing the `Operation` trait.
///
/// ```rust,ignore
/// #[derive(Operation)]
/// #[operation(output = Option<User>)]
/// struct FindUser {
///     id: u64,
/// }
///
/// assert_eq!(FindUser::NAME, "find_user");
/// ```
///
/// `output` is required. `name = "..."` overrides the default, which is the
/// type name in snake case.
#[proc_macro_derive(Operation, attributes(operation))]
pub fn derive_operation(input: TokenStream) -> TokenStream {
    operation::derive_operation_impl(input)
}
