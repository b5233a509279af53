//! Shared error taxonomy for the object store core
//!
//! Every failure the core can produce is a [`CoreError`] variant, so callers
//! can match on the structured value (through `anyhow::Error::downcast_ref`)
//! instead of string matching. The core itself never prints or logs; commands
//! decide how each variant surfaces to the user.

use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// The digest is unknown to the object database.
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    /// Stored bytes do not follow the object wire format.
    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// Refused before any write happens, so no partial object is persisted.
    #[error("object size {size} exceeds the {limit} byte limit")]
    ObjectTooLarge { size: usize, limit: usize },
}

impl CoreError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        CoreError::MalformedObject(reason.into())
    }
}
