/// Declares an integer-backed identifier newtype.
///
/// The generated type is `Copy`, ordered and hashable, and serializes as the
/// bare integer (`#[serde(transparent)]`), so `{"id": 3}` reads straight into
/// it. `FromStr` trims surrounding whitespace and then requires the whole
/// input to be an integer, which is what keeps query-string ids typed.
///
/// ```
/// crm_backend::define_id_type! {
///     /// Identifier of an invoice.
///     i32, InvoiceId
/// }
///
/// let id: InvoiceId = " 7 ".parse().unwrap();
/// assert_eq!(id.value(), 7);
/// assert!("7 OR 1=1".parse::<InvoiceId>().is_err());
/// ```
#[macro_export]
macro_rules! define_id_type {
    ($(#[$meta:meta])* $inner:ty, $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub const fn value(&self) -> $inner {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::num::ParseIntError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl ::std::convert::From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl ::std::convert::From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}
