//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create integer ID wrappers for catalog
//! entities, and `define_token_id!` for identifiers minted at runtime.

/// Macro to define a type-safe integer ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `FromStr` so IDs can be taken straight from command-line arguments
///
/// # Example
///
/// ```rust
/// # use pocketshop_core::define_id;
/// define_id!(SkuId);
/// define_id!(BinId);
///
/// let sku = SkuId::new(1);
/// let bin = BinId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = bin;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Macro to define an opaque, runtime-minted identifier backed by a UUID.
///
/// The generated type serializes as the hyphenated UUID string and exposes
/// `generate()`, which mints a new identifier using the given constructor
/// (`new_v4` for random IDs, `now_v7` for time-ordered ones).
#[macro_export]
macro_rules! define_token_id {
    ($name:ident, $ctor:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Mint a fresh identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::$ctor())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

// Catalog entities carry stable integer IDs from the seed data
define_id!(ProductId);

// Runtime-minted identifiers
define_token_id!(AccountId, new_v4);
define_token_id!(OrderId, now_v7);
