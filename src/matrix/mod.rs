//! Layout-to-grid conversion engine.
//!
//! Components are placed into a shared coordinate space, every edge is
//! registered on a tolerance-merged axis, and `prepare()` turns the result
//! into a matrix of non-overlapping rectangles:
//!
//! 1. **Render** paints objects in z-order (painter's algorithm).
//! 2. **Analyze** splits partly covered objects into rectangular fragments.
//! 3. **Optimize borders** (optional) drops borders drawn twice.

mod analyze;
mod axis;
mod borders;
mod builder;
mod options;
mod pages;
mod placement;
mod progress;
mod render;
mod styles;

pub use axis::CoordinateAxis;
pub use builder::{ExportMatrix, FILL_OBJECT};
pub use options::{MatrixOptions, EDITABLE_TOLERANCE, PRECISE_TOLERANCE};
pub use pages::{Page, PageList};
pub use progress::{Phase, Progress, ProgressCallback};
pub use styles::StyleTable;
