//! Convenience macros for the access model.

/// Macro for building a grant set with a clean syntax.
///
/// # Examples
///
/// ```rust
/// use access_model::grants;
///
/// let set = grants! {
///     "viewer" => true,
///     "list stories" => true,
///     "delete stories" => false,
/// };
/// assert!(set.has("list stories"));
/// assert!(!set.has("delete stories"));
/// ```
#[macro_export]
macro_rules! grants {
    () => {
        $crate::grant::GrantSet::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut set = $crate::grant::GrantSet::new();
            $(
                set.set($key, $value);
            )+
            set
        }
    };
}

/// Macro for declaring a role catalog in a single expression.
///
/// Expands to [`RoleCatalog::new`](crate::catalog::RoleCatalog::new), so the
/// result is a `Result` and slug collisions are reported.
///
/// # Examples
///
/// ```rust
/// use access_model::role_catalog;
///
/// let catalog = role_catalog! {
///     "moderator" => ["list members", "suspend members"],
///     "guest" => [],
/// }?;
/// assert_eq!(catalog.permissions_for("moderator").len(), 2);
/// # Ok::<(), access_model::Error>(())
/// ```
#[macro_export]
macro_rules! role_catalog {
    ($($slug:expr => [$($permission:expr),* $(,)?]),* $(,)?) => {
        $crate::catalog::RoleCatalog::new(::std::vec![
            $(
                $crate::catalog::CatalogEntry::new(
                    $slug,
                    ::std::vec::Vec::<$crate::permission::Permission>::from([
                        $($crate::permission::Permission::from($permission)),*
                    ]),
                )
            ),*
        ])
    };
}
