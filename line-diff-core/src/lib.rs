//! Generic line-level diffing primitives used by higher-level tools.

pub mod diff;
pub mod format;
pub mod split;

pub use diff::{diff_lines, DiffRow};
pub use format::{format_json, format_side_by_side, format_summary, format_text};
pub use split::split_embedded;
