//! Grid statistics.

use serde::{Deserialize, Serialize};

use crate::matrix::ExportMatrix;

/// Statistics collected from a finished grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStats {
    /// Number of pages
    pub page_count: usize,

    /// Number of columns
    pub column_count: usize,

    /// Number of rows
    pub row_count: usize,

    /// Objects placed by the producer (fill object included)
    pub placed_count: usize,

    /// Fragments synthesized by the analyze pass
    pub fragment_count: usize,

    /// Objects that own cells
    pub live_count: usize,

    /// Live objects spanning more than one cell
    pub merged_count: usize,

    /// Live objects carrying text
    pub text_count: usize,

    /// Cells owned by no object
    pub empty_cell_count: usize,

    /// Distinct styles
    pub style_count: usize,

    /// Distinct pictures
    pub picture_count: usize,
}

impl GridStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a grid.
    pub fn from_matrix(matrix: &ExportMatrix) -> Self {
        let fragment_count = matrix.objects().iter().filter(|o| o.is_fragment()).count();
        let live = matrix.live_objects();

        let mut stats = Self {
            page_count: matrix.page_count(),
            column_count: matrix.width(),
            row_count: matrix.height(),
            placed_count: matrix.object_count() - fragment_count,
            fragment_count,
            live_count: live.len(),
            style_count: matrix.style_count(),
            picture_count: matrix.picture_count(),
            ..Self::default()
        };

        for object in live.iter().filter_map(|&id| matrix.object_at(id)) {
            if object.grid.area() > 1 {
                stats.merged_count += 1;
            }
            if !object.text().is_empty() {
                stats.text_count += 1;
            }
        }

        stats.empty_cell_count = (0..matrix.height())
            .flat_map(|y| (0..matrix.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| matrix.cell(x, y).is_none())
            .count();
        stats
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.column_count * self.row_count
    }
}
