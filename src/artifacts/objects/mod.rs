//! Object types and their wire format
//!
//! All repository content is stored as objects identified by SHA-1 digests.
//! There are three kinds:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (names, modes, and object IDs)
//! - **Commit**: Snapshot with metadata (author, message, parents, tree)
//!
//! Every object serializes to the canonical form `<kind> <size>\0<content>`;
//! the digest is always computed over these canonical bytes, before any
//! storage-side compression.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 digest in hexadecimal form
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 digest in raw bytes
pub const RAW_OBJECT_ID_LENGTH: usize = 20;

/// Upper bound on a serialized object; exceeding it refuses the write
pub const MAX_OBJECT_SIZE: usize = 1 << 30;
