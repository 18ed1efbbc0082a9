//! # Typed Identifiers
//!
//! Actors hand out sequential `u32` IDs (see [`ActorEntity::Id`](crate::ActorEntity::Id)).
//! [`entity_id!`](crate::entity_id) wraps that counter in a newtype per
//! aggregate so a stock ID can never be passed where an order ID is expected.

/// Declares a `<Name>Id(pub u32)` newtype usable as [`ActorEntity::Id`](crate::ActorEntity::Id).
///
/// The generated type is `Copy`, ordered, serde-serializable (the calling
/// crate must depend on `serde`) and displays as `<snake_name>_<n>`.
///
/// ```rust
/// actor_framework::entity_id!(
///     /// Identifier of a prep station.
///     PrepStation
/// );
///
/// let id = PrepStationId::from(7);
/// assert_eq!(id.to_string(), "prep_station_7");
/// ```
#[macro_export]
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $crate::paste::paste! {
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
                ::serde::Serialize, ::serde::Deserialize,
            )]
            pub struct [<$name Id>](pub u32);

            impl From<u32> for [<$name Id>] {
                fn from(id: u32) -> Self {
                    Self(id)
                }
            }

            impl ::std::fmt::Display for [<$name Id>] {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    write!(f, "{}_{}", stringify!([<$name:snake>]), self.0)
                }
            }
        }
    };
}
