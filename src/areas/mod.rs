//! Core repository areas
//!
//! The fundamental building blocks of a repository:
//!
//! - `database`: Content-addressable object store for blobs, trees, and commits
//! - `index`: Staging area mapping working-tree paths to staged blob digests
//! - `refs`: Branch references and the HEAD pointer
//! - `repository`: Session context tying the areas together
//! - `workspace`: Working directory byte source

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
