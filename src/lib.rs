//! # exportgrid
//!
//! Layout-to-grid conversion for table-based export formats.
//!
//! A report renderer produces pages of absolutely positioned, possibly
//! overlapping rectangles (text boxes, lines, shapes, band backgrounds,
//! pictures). Formats such as HTML tables, word-processor tables and
//! spreadsheets need a non-overlapping grid of rows and columns with merged
//! cells instead. This library builds that grid.
//!
//! ## Quick Start
//!
//! ```
//! use exportgrid::{ComponentInfo, ExportMatrix, MatrixOptions, PageInfo};
//!
//! let mut matrix = ExportMatrix::new(MatrixOptions::precise());
//! matrix.add_page(
//!     &PageInfo::a4(),
//!     &[
//!         ComponentInfo::text(0.0, 0.0, 10.0, 10.0, "A"),
//!         ComponentInfo::text(5.0, 5.0, 10.0, 10.0, "B"),
//!     ],
//! )?;
//! matrix.prepare();
//!
//! for y in 0..matrix.height() {
//!     for x in 0..matrix.width() {
//!         if let Some(id) = matrix.cell(x, y) {
//!             let object = matrix.object_at(id).unwrap();
//!             println!("({x}, {y}) -> {} {:?}", object.role, object.text());
//!         }
//!     }
//! }
//! # Ok::<(), exportgrid::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Tolerance-merged axes**: nearby coordinates collapse into one grid line
//! - **Painter's algorithm**: later components cover earlier ones
//! - **Rectangle repair**: partly covered objects are split into fragments
//! - **Border optimization**: borders drawn twice across a shared edge are dropped
//! - **Multi-page output**: pages stack in one coordinate space
//! - **Picture deduplication**: identical images are stored once (MD5)

pub mod error;
pub mod layout;
pub mod matrix;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{build_matrix, Layout, LayoutPage};
pub use matrix::{
    CoordinateAxis, ExportMatrix, MatrixOptions, Phase, Progress, ProgressCallback,
    EDITABLE_TOLERANCE, PRECISE_TOLERANCE,
};
pub use model::{
    Border, BorderLine, Color, ComponentInfo, Content, Font, GridObject, GridRect,
    HorizontalAlign, LineStyle, Margins, ObjectRole, PageInfo, Padding, Picture, Side, Style,
    VerticalAlign,
};
pub use render::{GridStats, GridVisitor, JsonFormat, MergedCell, VisitorAction};

use std::path::Path;

/// Build a grid from a layout JSON file with default options.
///
/// # Example
///
/// ```no_run
/// use exportgrid::build_file;
///
/// let matrix = build_file("layout.json").unwrap();
/// println!("{}x{} cells", matrix.width(), matrix.height());
/// ```
pub fn build_file<P: AsRef<Path>>(path: P) -> Result<ExportMatrix> {
    ExportGrid::new().build_file(path).map(GridResult::into_matrix)
}

/// Convert a layout JSON file to a grid snapshot in JSON.
///
/// # Example
///
/// ```no_run
/// use exportgrid::{to_json, JsonFormat};
///
/// let json = to_json("layout.json", JsonFormat::Pretty).unwrap();
/// std::fs::write("grid.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    ExportGrid::new().build_file(path)?.to_json(format)
}

/// Builder for converting layouts into grids.
///
/// # Example
///
/// ```
/// use exportgrid::{ComponentInfo, ExportGrid, Layout, PageInfo};
///
/// let layout = Layout::new().with_page(
///     PageInfo::a4(),
///     vec![ComponentInfo::text(0.0, 0.0, 100.0, 20.0, "Title")],
/// );
/// let result = ExportGrid::new()
///     .editable()
///     .with_optimized_borders()
///     .build(&layout)?;
/// assert_eq!(result.stats().live_count, 1);
/// # Ok::<(), exportgrid::Error>(())
/// ```
pub struct ExportGrid {
    options: MatrixOptions,
    progress: Option<ProgressCallback>,
}

impl ExportGrid {
    /// Create a new ExportGrid builder.
    pub fn new() -> Self {
        Self {
            options: MatrixOptions::default(),
            progress: None,
        }
    }

    /// Use the given options.
    pub fn with_options(mut self, options: MatrixOptions) -> Self {
        self.options = options;
        self
    }

    /// Use the pixel-exact tolerance.
    pub fn precise(mut self) -> Self {
        self.options = self.options.with_tolerance(PRECISE_TOLERANCE);
        self
    }

    /// Use the coarse, editable tolerance.
    pub fn editable(mut self) -> Self {
        self.options = self.options.with_tolerance(EDITABLE_TOLERANCE);
        self
    }

    /// Set the merge tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.options = self.options.with_tolerance(tolerance);
        self
    }

    /// Set the zoom factor.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.options = self.options.with_zoom(zoom);
        self
    }

    /// Enable border optimization.
    pub fn with_optimized_borders(mut self) -> Self {
        self.options = self.options.with_optimized_borders(true);
        self
    }

    /// Enable the full-bleed background object.
    pub fn with_fill_area(mut self) -> Self {
        self.options = self.options.with_fill_area(true);
        self
    }

    /// Enable the background object, cropped to the content bounds.
    pub fn with_cropped_fill_area(mut self) -> Self {
        self.options = self.options.with_fill_area(true).with_crop_fill_area(true);
        self
    }

    /// Disable parallel picture hashing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set a progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Build and prepare a grid from a layout.
    pub fn build(self, layout: &Layout) -> Result<GridResult> {
        let mut matrix = ExportMatrix::new(self.options);
        if let Some(callback) = self.progress {
            matrix = matrix.with_progress(callback);
        }
        layout.feed(&mut matrix)?;
        matrix.prepare();
        Ok(GridResult { matrix })
    }

    /// Load a layout JSON file and build a grid from it.
    pub fn build_file<P: AsRef<Path>>(self, path: P) -> Result<GridResult> {
        let layout = Layout::from_file(path)?;
        self.build(&layout)
    }
}

impl Default for ExportGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// A prepared grid.
#[derive(Debug)]
pub struct GridResult {
    matrix: ExportMatrix,
}

impl GridResult {
    /// Convert to a JSON snapshot.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.matrix, format)
    }

    /// Convert to a plain text dump.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.matrix)
    }

    /// Collect statistics.
    pub fn stats(&self) -> GridStats {
        GridStats::from_matrix(&self.matrix)
    }

    /// Walk the grid with a visitor.
    pub fn walk<V: GridVisitor + ?Sized>(&self, visitor: &mut V) -> bool {
        render::walk_grid(&self.matrix, visitor)
    }

    /// Get the grid.
    pub fn matrix(&self) -> &ExportMatrix {
        &self.matrix
    }

    /// Take the grid.
    pub fn into_matrix(self) -> ExportMatrix {
        self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Layout {
        Layout::new().with_page(
            PageInfo::new(200.0, 100.0),
            vec![
                ComponentInfo::text(0.0, 0.0, 100.0, 20.0, "Left"),
                ComponentInfo::text(100.0, 0.0, 100.0, 20.0, "Right"),
            ],
        )
    }

    #[test]
    fn test_export_grid_builder() {
        let grid = ExportGrid::new().editable().with_zoom(2.0).with_optimized_borders();

        assert_eq!(grid.options.tolerance, EDITABLE_TOLERANCE);
        assert_eq!(grid.options.zoom, 2.0);
        assert!(grid.options.optimize_borders);
    }

    #[test]
    fn test_build_result() {
        let result = ExportGrid::new().sequential().build(&sample()).unwrap();

        assert!(result.matrix().is_prepared());
        assert_eq!(result.stats().text_count, 2);
        assert!(result.to_text().unwrap().contains("\"Right\""));
        assert!(result.to_json(JsonFormat::Compact).unwrap().contains("\"Left\""));
    }

    #[test]
    fn test_build_rejects_invalid_layout() {
        let layout = Layout::new().with_page(
            PageInfo::a4(),
            vec![ComponentInfo::text(f32::INFINITY, 0.0, 1.0, 1.0, "x")],
        );
        let result = ExportGrid::new().build(&layout);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_build_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = sample().to_json(JsonFormat::Pretty).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let matrix = build_file(file.path()).unwrap();
        assert_eq!(matrix.page_count(), 1);
        assert_eq!(matrix.live_objects().len(), 2);
    }

    #[test]
    fn test_build_missing_file() {
        let result = build_file("/nonexistent/layout.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
