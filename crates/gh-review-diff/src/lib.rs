//! Diff parsing and addressing for gh-review
//!
//! Turns raw unified-diff text (as returned by the GitHub API) into
//! per-file change records with line-exact added/deleted content, builds
//! the per-file map of commentable line numbers, and decides which changed
//! files are worth analyzing at all.

pub mod filter;
pub mod linemap;
pub mod model;
pub mod parser;

pub use filter::FileFilter;
pub use linemap::{build_line_maps, LineMap};
pub use model::{FileChange, FileStatus};
pub use parser::{parse_diff, DiffError};
