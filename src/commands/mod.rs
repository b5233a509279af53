//! Command implementations
//!
//! Commands are split the way git splits them:
//!
//! - `plumbing`: direct object manipulation (hash-object, cat-file)
//! - `porcelain`: user-facing workflows (init, add, rm, ls-files, commit, log)
//!
//! Commands own all user-visible output, written through the repository's
//! injected writer; the areas and artifacts beneath them only return values.

pub mod plumbing;
pub mod porcelain;
