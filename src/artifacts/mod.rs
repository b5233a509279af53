//! Version control data structures and algorithms
//!
//! This module contains the core types the repository areas operate on:
//!
//! - `core`: Shared error taxonomy for the object store and index
//! - `index`: Staging area entries and their on-disk record format
//! - `log`: Commit history traversal
//! - `objects`: Object types (blob, tree, commit) and their wire format

pub mod core;
pub mod index;
pub mod log;
pub mod objects;
