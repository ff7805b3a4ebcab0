//! Operation trait for dispatch-mediated calls.

/// A typed, dispatch-mediated call.
///
/// The implementing value is the argument bundle of the call. It is moved
/// through the wrapper chain and finally handed to the strategy, which
/// produces an [`Operation::Output`].
///
/// Operations are identified inside a repository by [`Operation::NAME`].
///
/// # Example
///
/// ```rust,ignore
/// struct FindUser {
///     id: u64,
/// }
///
/// impl Operation for FindUser {
///     const NAME: &'static str = "find_user";
///     type Output = Option<User>;
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Operation`",
    label = "missing `Operation` implementation",
    note = "Operations must name themselves and declare the `Output` their strategy returns."
)]
pub trait Operation: Send + 'static {
    /// Name under which the operation is declared and cached.
    const NAME: &'static str;

    /// The value returned by the strategy (or by a short-circuiting wrapper).
    type Output: Send + 'static;
}
