//! Owner: the user account a turf belongs to.
//!
//! Owners live in an external user directory; turfbook only reads them to
//! validate ownership and to decorate turf views.

use serde::{Deserialize, Serialize};

use crate::id::OwnerId;

/// A turf owner as seen by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    pub phone: Option<String>,
}
