//! Typed identifier newtypes backed by UUIDs.
//!
//! Each record kind gets its own id type so that a booking id can never be
//! passed where a turf id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }

            /// Parse user-supplied text, reporting failures as a validation error.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::InvalidId`] when `text` is not a UUID.
            pub fn parse(text: &str) -> Result<Self, ValidationError> {
                Self::from_str(text).map_err(|_| ValidationError::InvalidId(text.to_owned()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Turf`](crate::turf::Turf).
    TurfId
);

define_id!(
    /// Unique identifier for an [`Owner`](crate::owner::Owner).
    OwnerId
);

define_id!(
    /// Unique identifier for a [`Booking`](crate::booking::Booking).
    BookingId
);

define_id!(
    /// Unique identifier for a [`BlockedSlot`](crate::blocked_slot::BlockedSlot).
    BlockedSlotId
);

define_id!(
    /// Unique identifier for a [`TurfImage`](crate::image::TurfImage).
    TurfImageId
);
