//! Visitor pattern for walking a finished grid.
//!
//! Format emitters (HTML tables, spreadsheet cells, word-processor tables)
//! walk the grid row by row; each merged cell is visited once, at its
//! top-left cell.
//!
//! # Example
//!
//! ```
//! use exportgrid::render::visitor::{GridVisitor, MergedCell, VisitorAction};
//!
//! struct TextCollector(Vec<String>);
//!
//! impl GridVisitor for TextCollector {
//!     fn visit_cell(&mut self, cell: &MergedCell<'_>) -> VisitorAction {
//!         if !cell.object.text().is_empty() {
//!             self.0.push(cell.object.text().to_string());
//!         }
//!         VisitorAction::Continue
//!     }
//! }
//! ```

use crate::matrix::ExportMatrix;
use crate::model::{GridObject, GridRect, Style};

/// Action returned by visitor methods to control the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Continue walking.
    #[default]
    Continue,

    /// Skip the rest of the current row.
    Skip,

    /// Stop the walk.
    Stop,
}

impl VisitorAction {
    /// Check if this action skips the rest of the row.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitorAction::Skip)
    }

    /// Check if this action ends the walk.
    pub fn should_stop(&self) -> bool {
        matches!(self, VisitorAction::Stop)
    }
}

/// A merged cell: one live object and the grid rectangle it owns.
#[derive(Debug, Clone, Copy)]
pub struct MergedCell<'a> {
    /// Object id
    pub id: usize,
    /// Owned cells
    pub rect: GridRect,
    /// The object
    pub object: &'a GridObject,
    /// The object's style
    pub style: &'a Style,
    /// Left edge of the cell rectangle
    pub left: f32,
    /// Top edge of the cell rectangle
    pub top: f32,
    /// Width of the cell rectangle (zero for cells in the last column)
    pub width: f32,
    /// Height of the cell rectangle (zero for cells in the last row)
    pub height: f32,
}

impl MergedCell<'_> {
    /// Check if the cell spans more than one column or row.
    pub fn is_merged(&self) -> bool {
        self.rect.span_x > 1 || self.rect.span_y > 1
    }
}

/// Trait for visiting a grid row by row.
///
/// All methods have no-op defaults returning `VisitorAction::Continue`.
pub trait GridVisitor {
    /// Called when a row is the first row of a new page.
    ///
    /// # Arguments
    /// * `page` - 0-indexed page the row belongs to
    fn on_page_break(&mut self, page: usize) {
        let _ = page;
    }

    /// Called before the cells of a row. `Skip` skips the whole row.
    fn on_row_start(&mut self, row: usize, top: f32) -> VisitorAction {
        let _ = (row, top);
        VisitorAction::Continue
    }

    /// Called once per merged cell, at its top-left cell.
    fn visit_cell(&mut self, cell: &MergedCell<'_>) -> VisitorAction {
        let _ = cell;
        VisitorAction::Continue
    }

    /// Called for cells owned by no object.
    fn visit_empty(&mut self, x: usize, y: usize) -> VisitorAction {
        let _ = (x, y);
        VisitorAction::Continue
    }

    /// Called after the cells of a row.
    fn on_row_end(&mut self, row: usize) {
        let _ = row;
    }
}

/// Default visitor that performs no customization.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl DefaultVisitor {
    /// Create a new default visitor.
    pub fn new() -> Self {
        Self
    }
}

impl GridVisitor for DefaultVisitor {}

/// Walk every row of the grid. Returns `false` if the visitor stopped early.
pub fn walk_grid<V: GridVisitor + ?Sized>(matrix: &ExportMatrix, visitor: &mut V) -> bool {
    // Row index at which each page after the first begins.
    let page_starts: Vec<(usize, usize)> = (1..matrix.page_count())
        .filter_map(|page| {
            let top = matrix.page_break_y(page - 1)?;
            let row = matrix.y_positions().iter().position(|&y| y >= top)?;
            Some((row, page))
        })
        .collect();

    for y in 0..matrix.height() {
        for &(_, page) in page_starts.iter().filter(|(row, _)| *row == y) {
            visitor.on_page_break(page);
        }

        let top = matrix.axis_y_position(y).unwrap_or(0.0);
        match visitor.on_row_start(y, top) {
            VisitorAction::Stop => return false,
            VisitorAction::Skip => {
                visitor.on_row_end(y);
                continue;
            }
            VisitorAction::Continue => {}
        }

        for x in 0..matrix.width() {
            let action = match matrix.cell(x, y) {
                None => visitor.visit_empty(x, y),
                Some(id) => match merged_cell(matrix, id) {
                    Some(cell) if cell.rect.x == x && cell.rect.y == y => visitor.visit_cell(&cell),
                    _ => VisitorAction::Continue,
                },
            };
            match action {
                VisitorAction::Stop => return false,
                VisitorAction::Skip => break,
                VisitorAction::Continue => {}
            }
        }
        visitor.on_row_end(y);
    }
    true
}

fn merged_cell(matrix: &ExportMatrix, id: usize) -> Option<MergedCell<'_>> {
    let object = matrix.object_at(id)?;
    let rect = matrix.object_grid_position(id)?;
    let style = matrix.style_at(object.style)?;
    let left = matrix.axis_x_position(rect.x)?;
    let top = matrix.axis_y_position(rect.y)?;
    let right = matrix.axis_x_position(rect.right()).unwrap_or(left);
    let bottom = matrix.axis_y_position(rect.bottom()).unwrap_or(top);
    Some(MergedCell {
        id,
        rect,
        object,
        style,
        left,
        top,
        width: right - left,
        height: bottom - top,
    })
}
