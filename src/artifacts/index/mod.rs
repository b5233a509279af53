//! Staging area record format
//!
//! The index persists as a plain text file with one record per staged entry:
//!
//! ```text
//! <octal-mode> <40-hex-digest> <path>
//! ```
//!
//! Records are written sorted by path, which keeps the file diff-friendly and
//! makes parsing order-independent. The staging area is the only mutable
//! persisted state in the core; objects are write-once.

pub mod entry_mode;
pub mod index_entry;
