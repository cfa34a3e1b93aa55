//! Consumer-side helpers over a finished grid.

mod json;
mod stats;
mod text;
pub mod visitor;

pub use json::{to_json, GridSnapshot, JsonFormat, ObjectEntry, PictureEntry};
pub use stats::GridStats;
pub use text::to_text;
pub use visitor::{walk_grid, DefaultVisitor, GridVisitor, MergedCell, VisitorAction};
