/// Defines a repository type with one entry point per declared operation.
///
/// The generated type wraps a [`Repository`](crate::Repository) named after
/// the type, declares every listed operation in `new()`, and dereferences to
/// the repository for configuration.
///
/// # Example
/// ```rust,ignore
/// mediate! {
///     /// User storage.
///     pub struct Users {
///         /// Look a user up by id.
///         pub fn find_user(FindUser);
///         pub fn save_user(SaveUser);
///     }
/// }
///
/// let users = Users::new()?;
/// users.configure_strategy(StrategySpec::new::<InMemoryUsers>());
/// let found = users.find_user(FindUser { id: 1 })?;
/// ```
#[macro_export]
macro_rules! mediate {
    (
        $(#[$meta:meta])*
        $vis:vis struct $repo:ident {
            $(
                $(#[$method_meta:meta])*
                $method_vis:vis fn $method:ident($op:ty);
            )*
        }
    ) => {
        $(#[$meta])*
        $vis struct $repo {
            repository: $crate::Repository,
        }

        impl $repo {
            /// Create the repository with every operation declared and no
            /// strategy configured.
            $vis fn new() -> ::core::result::Result<Self, $crate::MediateError> {
                let repository = $crate::Repository::new(::core::stringify!($repo));
                $( repository.declare::<$op>()?; )*
                ::core::result::Result::Ok(Self { repository })
            }

            $(
                $(#[$method_meta])*
                $method_vis fn $method(
                    &self,
                    op: $op,
                ) -> ::core::result::Result<<$op as $crate::Operation>::Output, $crate::MediateError> {
                    self.repository.call(op)
                }
            )*
        }

        impl ::core::ops::Deref for $repo {
            type Target = $crate::Repository;

            fn deref(&self) -> &Self::Target {
                &self.repository
            }
        }

        impl ::core::fmt::Debug for $repo {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(&self.repository, f)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{MediateError, Operation, Perform, StrategySpec};

    struct Len(&'static str);
    impl Operation for Len {
        const NAME: &'static str = "len";
        type Output = usize;
    }

    struct Counter;
    impl Perform<Len> for Counter {
        fn perform(&self, op: Len) -> usize {
            op.0.len()
        }
    }

    crate::mediate! {
        struct Text {
            fn len(Len);
        }
    }

    #[test]
    fn test_generated_entry_points() {
        let text = Text::new().unwrap();
        assert_eq!(text.name(), "Text");
        assert!(text.is_declared::<Len>());
        assert_eq!(
            text.len(Len("abc")),
            Err(MediateError::NotConfigured {
                repository: "Text".to_string(),
            })
        );

        text.configure_strategy(StrategySpec::builder(|| Counter).perform::<Len>().build());
        assert_eq!(text.len(Len("abc")), Ok(3));
    }
}
