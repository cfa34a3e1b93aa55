//! The export matrix: object store, page list and the query surface.

use std::fmt;

use rayon::prelude::*;

use super::axis::CoordinateAxis;
use super::options::MatrixOptions;
use super::pages::{Page, PageList};
use super::progress::{Phase, Progress, ProgressCallback};
use super::styles::StyleTable;
use crate::error::{Error, Result};
use crate::layout::validate_page;
use crate::model::{
    picture_digest, ComponentInfo, Content, GridObject, GridRect, Margins, ObjectRole, PageInfo,
    Picture, PictureDigest, PictureStore, Style,
};

/// How far the builder has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Stage {
    Open,
    Rendered,
    Analyzed,
    Prepared,
}

/// Converts pages of absolutely positioned components into a grid of
/// non-overlapping, possibly merged cells.
pub struct ExportMatrix {
    pub(super) options: MatrixOptions,
    pub(super) x_axis: CoordinateAxis,
    pub(super) y_axis: CoordinateAxis,
    pub(super) objects: Vec<GridObject>,
    pub(super) styles: StyleTable,
    pub(super) pictures: PictureStore,
    pub(super) pages: PageList,
    pub(super) cells: Vec<Option<usize>>,
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) stage: Stage,
    expected_pages: usize,
    progress: Option<ProgressCallback>,
}

/// Id of the full-bleed background object when `fill_area` is enabled.
pub const FILL_OBJECT: usize = 0;

impl ExportMatrix {
    /// Create a new builder with the given options.
    pub fn new(options: MatrixOptions) -> Self {
        let mut matrix = Self {
            x_axis: CoordinateAxis::new(options.tolerance)
                .with_max_distance(options.max_cell_width),
            y_axis: CoordinateAxis::new(options.tolerance)
                .with_max_distance(options.max_cell_height),
            options,
            objects: Vec::new(),
            styles: StyleTable::new(),
            pictures: PictureStore::new(),
            pages: PageList::new(),
            cells: Vec::new(),
            width: 0,
            height: 0,
            stage: Stage::Open,
            expected_pages: 0,
            progress: None,
        };
        matrix.reserve_fill_object();
        matrix
    }

    /// Set a progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Announce how many pages will be added, for progress reporting.
    pub fn expect_pages(&mut self, count: usize) {
        self.expected_pages = count;
    }

    /// The options this builder was created with.
    pub fn options(&self) -> &MatrixOptions {
        &self.options
    }

    fn reserve_fill_object(&mut self) {
        if !self.options.fill_area {
            return;
        }
        let style = self
            .styles
            .intern(Style::new().with_fill(self.options.background));
        self.objects.push(GridObject::new(
            0.0,
            0.0,
            0.0,
            0.0,
            ObjectRole::Shape,
            style,
            Content::default(),
        ));
    }

    /// Add a page of components in z-order. Returns the page index.
    pub fn add_page(&mut self, page: &PageInfo, components: &[ComponentInfo]) -> Result<usize> {
        if self.stage >= Stage::Rendered {
            return Err(Error::AlreadyPrepared);
        }
        let zoom = self.options.zoom;
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(Error::InvalidGeometry(format!("zoom {}", zoom)));
        }
        validate_page(self.pages.len(), page, components)?;

        let digests = self.picture_digests(components);

        let watermark = page.watermark.as_ref().map(|data| self.pictures.insert(data.clone()));
        let offset = self.pages.next_offset();
        let index = self.pages.push(page, self.options.zoom, watermark);
        if let Some(break_y) = self.pages.get(index).map(|p| p.break_y) {
            self.y_axis.add(break_y);
        }

        for (component, digest) in components.iter().zip(digests) {
            self.place(offset, component, digest);
        }

        log::debug!(
            "ExportMatrix: page {} placed {} components ({} objects total)",
            index + 1,
            components.len(),
            self.objects.len()
        );
        self.report(Phase::Placing);
        Ok(index)
    }

    fn picture_digests(&self, components: &[ComponentInfo]) -> Vec<Option<PictureDigest>> {
        let digest = |c: &ComponentInfo| c.picture.as_deref().map(picture_digest);
        if self.options.parallel {
            components.par_iter().map(digest).collect()
        } else {
            components.iter().map(digest).collect()
        }
    }

    /// Run Render, Analyze and, when enabled, Optimize Borders.
    ///
    /// Calling it again after the grid is prepared does nothing.
    pub fn prepare(&mut self) {
        if self.stage == Stage::Prepared {
            return;
        }
        self.analyze();
        if self.options.optimize_borders {
            self.optimize_borders();
        }
        self.stage = Stage::Prepared;
        self.report(Phase::Done);
    }

    /// Check if `prepare` has completed.
    pub fn is_prepared(&self) -> bool {
        self.stage == Stage::Prepared
    }

    /// Check if the grid has been rendered (pages can no longer be added).
    pub fn is_rendered(&self) -> bool {
        self.stage >= Stage::Rendered
    }

    /// Release every object, style, picture and page and reopen the builder.
    pub fn clear(&mut self) {
        self.x_axis.clear();
        self.y_axis.clear();
        self.objects.clear();
        self.styles.clear();
        self.pictures.clear();
        self.pages.clear();
        self.cells = Vec::new();
        self.width = 0;
        self.height = 0;
        self.stage = Stage::Open;
        self.expected_pages = 0;
        self.reserve_fill_object();
    }

    pub(super) fn report(&mut self, phase: Phase) {
        let total_pages = self.expected_pages.max(self.pages.len());
        let current_page = self.pages.len();
        if let Some(callback) = self.progress.as_mut() {
            callback(&Progress {
                phase,
                current_page,
                total_pages,
            });
        }
    }

    pub(super) fn cell_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    // --- grid queries ---

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Object id owning the cell at `(x, y)`.
    pub fn cell(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[self.cell_index(x, y)]
    }

    /// Object id owning the cell that contains the point `(x, y)` in the
    /// shared coordinate space.
    pub fn object_at_point(&self, x: f32, y: f32) -> Option<usize> {
        let column = self.x_axis.cell_containing(x)?;
        let row = self.y_axis.cell_containing(y)?;
        self.cell(column, row)
    }

    /// Position of column line `index`.
    pub fn axis_x_position(&self, index: usize) -> Option<f32> {
        self.x_axis.position(index)
    }

    /// Position of row line `index`.
    pub fn axis_y_position(&self, index: usize) -> Option<f32> {
        self.y_axis.position(index)
    }

    /// All column line positions.
    pub fn x_positions(&self) -> &[f32] {
        self.x_axis.nodes()
    }

    /// All row line positions.
    pub fn y_positions(&self) -> &[f32] {
        self.y_axis.nodes()
    }

    // --- objects ---

    /// Number of objects, fragments included.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get an object by id.
    pub fn object_at(&self, id: usize) -> Option<&GridObject> {
        self.objects.get(id)
    }

    /// All objects in insertion order, fragments appended at the end.
    pub fn objects(&self) -> &[GridObject] {
        &self.objects
    }

    /// Grid rectangle of an object that occupies cells.
    pub fn object_grid_position(&self, id: usize) -> Option<GridRect> {
        self.objects
            .get(id)
            .filter(|obj| obj.resolved && obj.grid.area() > 0)
            .map(|obj| obj.grid)
    }

    /// Style of an object.
    pub fn object_style(&self, id: usize) -> Option<&Style> {
        self.objects.get(id).and_then(|obj| self.styles.get(obj.style))
    }

    /// Ids of objects that own cells in the finished grid, ascending.
    pub fn live_objects(&self) -> Vec<usize> {
        if self.stage < Stage::Analyzed {
            return Vec::new();
        }
        self.objects
            .iter()
            .enumerate()
            .filter(|(id, obj)| {
                obj.resolved
                    && obj.grid.area() > 0
                    && self.cell(obj.grid.x, obj.grid.y) == Some(*id)
            })
            .map(|(id, _)| id)
            .collect()
    }

    // --- styles ---

    /// Number of distinct styles.
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// Get a style by index.
    pub fn style_at(&self, index: usize) -> Option<&Style> {
        self.styles.get(index)
    }

    /// All styles in index order.
    pub fn styles(&self) -> &[Style] {
        self.styles.as_slice()
    }

    // --- pictures ---

    /// Get a stored picture.
    pub fn picture(&self, id: usize) -> Option<&Picture> {
        self.pictures.get(id)
    }

    /// Number of distinct pictures.
    pub fn picture_count(&self) -> usize {
        self.pictures.len()
    }

    /// Iterate over stored pictures in id order.
    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.pictures.iter()
    }

    // --- pages ---

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// All pages in order.
    pub fn pages(&self) -> &[Page] {
        self.pages.as_slice()
    }

    /// Bottom edge of a page in the shared coordinate space.
    pub fn page_break_y(&self, index: usize) -> Option<f32> {
        self.pages.get(index).map(|p| p.break_y)
    }

    /// Page width.
    pub fn page_width(&self, index: usize) -> Option<f32> {
        self.pages.get(index).map(|p| p.width)
    }

    /// Page height.
    pub fn page_height(&self, index: usize) -> Option<f32> {
        self.pages.get(index).map(|p| p.height)
    }

    /// Page margins.
    pub fn page_margins(&self, index: usize) -> Option<Margins> {
        self.pages.get(index).map(|p| p.margins)
    }

    /// Page orientation.
    pub fn page_landscape(&self, index: usize) -> Option<bool> {
        self.pages.get(index).map(|p| p.landscape)
    }

    /// Watermark picture of a page.
    pub fn page_watermark(&self, index: usize) -> Option<&Picture> {
        self.pages
            .get(index)
            .and_then(|p| p.watermark)
            .and_then(|id| self.pictures.get(id))
    }
}

impl Default for ExportMatrix {
    fn default() -> Self {
        Self::new(MatrixOptions::default())
    }
}

impl fmt::Debug for ExportMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportMatrix")
            .field("options", &self.options)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("objects", &self.objects.len())
            .field("styles", &self.styles.len())
            .field("pictures", &self.pictures.len())
            .field("pages", &self.pages.len())
            .field("stage", &self.stage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;
    use std::sync::{Arc, Mutex};

    fn page() -> PageInfo {
        PageInfo::new(100.0, 100.0)
    }

    #[test]
    fn test_single_text_object() {
        let mut matrix = ExportMatrix::default();
        matrix
            .add_page(&page(), &[ComponentInfo::text(0.0, 0.0, 100.0, 20.0, "Hello")])
            .unwrap();
        matrix.prepare();

        assert!(matrix.is_prepared());
        assert_eq!(matrix.object_count(), 1);
        assert_eq!(matrix.object_grid_position(0), Some(GridRect::new(0, 0, 1, 1)));
        assert_eq!(matrix.axis_x_position(1), Some(100.0));
        assert_eq!(matrix.axis_y_position(1), Some(20.0));
        assert_eq!(matrix.object_at(0).map(|o| o.text()), Some("Hello"));
        assert_eq!(matrix.live_objects(), vec![0]);
    }

    #[test]
    fn test_add_page_after_prepare_fails() {
        let mut matrix = ExportMatrix::default();
        matrix.add_page(&page(), &[]).unwrap();
        matrix.prepare();

        let err = matrix.add_page(&page(), &[]).unwrap_err();
        assert!(matches!(err, Error::AlreadyPrepared));
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let mut matrix = ExportMatrix::default();
        let bad = ComponentInfo::shape(0.0, 0.0, f32::NAN, 10.0);
        let err = matrix.add_page(&page(), &[bad]).unwrap_err();

        assert!(matches!(err, Error::InvalidGeometry(_)));
        assert_eq!(matrix.page_count(), 0);
        assert_eq!(matrix.object_count(), 0);
    }

    #[test]
    fn test_invalid_zoom_rejected() {
        for zoom in [f32::NAN, f32::INFINITY, 0.0, -1.0] {
            let mut matrix = ExportMatrix::new(MatrixOptions::new().with_zoom(zoom));
            let text = ComponentInfo::text(0.0, 0.0, 10.0, 10.0, "x");
            let err = matrix.add_page(&page(), &[text]).unwrap_err();

            assert!(matches!(err, Error::InvalidGeometry(_)), "zoom {zoom}");
            assert_eq!(matrix.page_count(), 0);
        }
    }

    #[test]
    fn test_max_cell_width_splits_columns() {
        let mut matrix = ExportMatrix::new(MatrixOptions::new().with_max_cell_width(10.0));
        matrix
            .add_page(&page(), &[ComponentInfo::text(0.0, 0.0, 100.0, 20.0, "wide")])
            .unwrap();
        matrix.prepare();

        let rect = matrix.object_grid_position(0).unwrap();
        assert!(rect.span_x > 1);
        assert_eq!(rect.span_y, 1);
        assert_eq!(matrix.live_objects(), vec![0]);
        assert!(matrix
            .x_positions()
            .windows(2)
            .all(|w| w[1] - w[0] <= 10.0 + 1e-3));
    }

    #[test]
    fn test_max_cell_height_splits_rows() {
        let mut matrix = ExportMatrix::new(MatrixOptions::new().with_max_cell_height(15.0));
        matrix
            .add_page(&page(), &[ComponentInfo::text(0.0, 0.0, 20.0, 60.0, "tall")])
            .unwrap();
        matrix.prepare();

        let rect = matrix.object_grid_position(0).unwrap();
        assert_eq!(rect.span_x, 1);
        assert!(rect.span_y > 1);
        assert_eq!(matrix.live_objects(), vec![0]);
        assert!(matrix
            .y_positions()
            .windows(2)
            .all(|w| w[1] - w[0] <= 15.0 + 1e-3));
    }

    #[test]
    fn test_fill_area_disabled_reserves_nothing() {
        let matrix = ExportMatrix::new(MatrixOptions::new().with_fill_area(false));
        assert_eq!(matrix.object_count(), 0);
    }

    #[test]
    fn test_pages_share_one_coordinate_space() {
        let mut matrix = ExportMatrix::default();
        matrix
            .add_page(&page(), &[ComponentInfo::text(0.0, 10.0, 50.0, 10.0, "one")])
            .unwrap();
        matrix
            .add_page(&page(), &[ComponentInfo::text(0.0, 10.0, 50.0, 10.0, "two")])
            .unwrap();
        matrix.prepare();

        assert_eq!(matrix.page_count(), 2);
        assert_eq!(matrix.page_break_y(0), Some(100.0));
        assert_eq!(matrix.page_break_y(1), Some(200.0));
        assert_eq!(matrix.object_at(1).map(|o| o.top), Some(110.0));
        assert!(matrix.y_positions().contains(&100.0));
        assert!(matrix.y_positions().contains(&200.0));
    }

    #[test]
    fn test_zoom_scales_geometry() {
        let mut matrix = ExportMatrix::new(MatrixOptions::new().with_zoom(2.0));
        matrix
            .add_page(&page(), &[ComponentInfo::shape(5.0, 5.0, 10.0, 10.0)])
            .unwrap();
        let obj = matrix.object_at(0).unwrap();

        assert_eq!((obj.left, obj.top, obj.width, obj.height), (10.0, 10.0, 20.0, 20.0));
        assert_eq!(matrix.page_break_y(0), Some(200.0));
        assert_eq!(matrix.page_height(0), Some(100.0));
    }

    #[test]
    fn test_identical_pictures_stored_once() {
        let png = b"\x89PNG\r\n\x1a\n0000".to_vec();
        let components = vec![
            ComponentInfo::picture(0.0, 0.0, 10.0, 10.0, png.clone()),
            ComponentInfo::picture(20.0, 0.0, 10.0, 10.0, png),
        ];
        let mut matrix = ExportMatrix::default();
        matrix
            .add_page(&page().with_watermark(b"GIF89a".to_vec()), &components)
            .unwrap();

        assert_eq!(matrix.picture_count(), 2);
        let first = matrix.object_at(0).and_then(|o| o.content.picture);
        let second = matrix.object_at(1).and_then(|o| o.content.picture);
        assert_eq!(first, second);
        assert_eq!(matrix.picture(first.unwrap()).map(|p| p.mime_type), Some("image/png"));
        assert_eq!(matrix.page_watermark(0).map(|p| p.mime_type), Some("image/gif"));
    }

    #[test]
    fn test_fill_object_reserved() {
        let options = MatrixOptions::new().with_fill_area(true).with_background(Color::WHITE);
        let mut matrix = ExportMatrix::new(options);
        assert_eq!(matrix.object_count(), 1);

        matrix
            .add_page(&page(), &[ComponentInfo::text(10.0, 10.0, 20.0, 20.0, "x")])
            .unwrap();
        matrix.prepare();

        // The text sits on top, so the background survives as fragments.
        let corner = matrix.cell(0, 0).unwrap();
        assert_eq!(matrix.object_at(corner).and_then(|o| o.parent), Some(FILL_OBJECT));
        assert_eq!(matrix.object_style(corner).map(|s| s.fill), Some(Color::WHITE));
        assert_eq!(matrix.object_at(FILL_OBJECT).map(|o| o.height), Some(100.0));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut matrix = ExportMatrix::new(MatrixOptions::new().with_fill_area(true));
        matrix
            .add_page(&page(), &[ComponentInfo::text(0.0, 0.0, 10.0, 10.0, "x")])
            .unwrap();
        matrix.prepare();
        matrix.clear();

        assert!(!matrix.is_prepared());
        assert_eq!(matrix.page_count(), 0);
        assert_eq!(matrix.object_count(), 1);
        assert_eq!(matrix.width(), 0);
        assert!(matrix.add_page(&page(), &[]).is_ok());
    }

    #[test]
    fn test_prepare_twice_is_noop() {
        let mut matrix = ExportMatrix::default();
        matrix
            .add_page(&page(), &[ComponentInfo::text(0.0, 0.0, 10.0, 10.0, "x")])
            .unwrap();
        matrix.prepare();
        let objects = matrix.object_count();
        matrix.prepare();
        assert_eq!(matrix.object_count(), objects);
    }

    #[test]
    fn test_progress_phases() {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        let mut matrix = ExportMatrix::new(MatrixOptions::new().with_optimized_borders(true))
            .with_progress(Box::new(move |p| sink.lock().unwrap().push(p.phase)));
        matrix.expect_pages(1);
        matrix.add_page(&page(), &[]).unwrap();
        matrix.prepare();

        assert_eq!(
            *phases.lock().unwrap(),
            vec![
                Phase::Placing,
                Phase::Rendering,
                Phase::Analyzing,
                Phase::OptimizingBorders,
                Phase::Done
            ]
        );
    }

    #[test]
    fn test_object_at_point() {
        let mut matrix = ExportMatrix::default();
        matrix
            .add_page(
                &page(),
                &[
                    ComponentInfo::shape(0.0, 0.0, 10.0, 10.0),
                    ComponentInfo::shape(10.0, 0.0, 10.0, 10.0),
                ],
            )
            .unwrap();
        matrix.prepare();

        assert_eq!(matrix.object_at_point(3.0, 3.0), Some(0));
        assert_eq!(matrix.object_at_point(15.0, 3.0), Some(1));
        assert_eq!(matrix.object_at_point(50.0, 50.0), None);
    }
}
