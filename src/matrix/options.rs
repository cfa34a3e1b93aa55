//! Grid building options and configuration.

use crate::model::Color;

/// Tolerance suited to pixel-exact (WYSIWYG) output.
pub const PRECISE_TOLERANCE: f32 = 0.5;

/// Tolerance suited to coarse, hand-editable output.
pub const EDITABLE_TOLERANCE: f32 = 8.0;

/// Options for building an export grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixOptions {
    /// Coordinates closer than this collapse into one grid line
    pub tolerance: f32,

    /// Maximum column width (None = unlimited)
    pub max_cell_width: Option<f32>,

    /// Maximum row height (None = unlimited)
    pub max_cell_height: Option<f32>,

    /// Place rotated text as a picture instead of a text cell
    pub rotated_as_image: bool,

    /// Reserve object 0 as a background covering the used area
    pub fill_area: bool,

    /// Crop the background object to the content bounds
    pub crop_fill_area: bool,

    /// Fill color of the background object
    pub background: Color,

    /// Remove borders duplicated by the neighbour above or to the left
    pub optimize_borders: bool,

    /// Uniform scale applied to all incoming geometry
    pub zoom: f32,

    /// Hash page pictures on the rayon pool before placement
    pub parallel: bool,
}

impl MatrixOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for pixel-exact output.
    pub fn precise() -> Self {
        Self::default().with_tolerance(PRECISE_TOLERANCE)
    }

    /// Options for coarse, editable output.
    pub fn editable() -> Self {
        Self::default().with_tolerance(EDITABLE_TOLERANCE)
    }

    /// Set the merge tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Set the maximum column width.
    pub fn with_max_cell_width(mut self, width: f32) -> Self {
        self.max_cell_width = Some(width);
        self
    }

    /// Set the maximum row height.
    pub fn with_max_cell_height(mut self, height: f32) -> Self {
        self.max_cell_height = Some(height);
        self
    }

    /// Enable or disable placing rotated text as pictures.
    pub fn with_rotated_as_image(mut self, enabled: bool) -> Self {
        self.rotated_as_image = enabled;
        self
    }

    /// Enable or disable the full-bleed background object.
    pub fn with_fill_area(mut self, enabled: bool) -> Self {
        self.fill_area = enabled;
        self
    }

    /// Crop the background object to the content bounds instead of the
    /// whole used area. Only takes effect with `fill_area`.
    pub fn with_crop_fill_area(mut self, crop: bool) -> Self {
        self.crop_fill_area = crop;
        self
    }

    /// Set the background object's fill color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Enable or disable border optimization.
    pub fn with_optimized_borders(mut self, enabled: bool) -> Self {
        self.optimize_borders = enabled;
        self
    }

    /// Set the zoom factor.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Enable or disable parallel picture hashing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel picture hashing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            tolerance: PRECISE_TOLERANCE,
            max_cell_width: None,
            max_cell_height: None,
            rotated_as_image: false,
            fill_area: false,
            crop_fill_area: false,
            background: Color::WHITE,
            optimize_borders: false,
            zoom: 1.0,
            parallel: true,
        }
    }
}
