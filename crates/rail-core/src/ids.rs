//! Strongly typed, zero-cost identifier wrappers.
//!
//! Stations, trains, routes and schedules are referenced by id from every
//! other repository, never by pointer, so there is no cyclic ownership
//! between them.  All IDs are `Copy + Ord + Hash`.

use std::fmt;

/// Ids that a [`Repository`](crate::Repository) can allocate in sequence.
pub trait SequentialId: Copy + Ord + fmt::Debug + fmt::Display {
    /// The id handed out for an empty repository.
    fn first() -> Self;
    /// The id following `self`.
    fn successor(self) -> Self;
}

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl SequentialId for $name {
            #[inline]
            fn first() -> Self {
                $name(0)
            }

            #[inline]
            fn successor(self) -> Self {
                $name(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Id of a station in the station repository.
    pub struct StationId(u32);
}

typed_id! {
    /// Id of a train in the train repository.
    pub struct TrainId(u32);
}

typed_id! {
    /// Id of a recurring route template.
    pub struct RouteId(u32);
}

typed_id! {
    /// Id of one concrete schedule instantiated from a route.
    pub struct ScheduleId(u32);
}
