//! Page and component input types handed over by the layout producer.

use super::{ObjectRole, Style};
use serde::{Deserialize, Serialize};

/// Page margins in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Left margin
    pub left: f32,
    /// Top margin
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin
    pub bottom: f32,
}

impl Margins {
    /// The same margin on every side.
    pub fn uniform(value: f32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }
}

/// Geometry of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Page margins
    #[serde(default)]
    pub margins: Margins,

    /// Landscape orientation
    #[serde(default)]
    pub landscape: bool,

    /// Watermark picture bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark: Option<Vec<u8>>,
}

impl PageInfo {
    /// Create a page with the given dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margins: Margins::default(),
            landscape: width > height,
            watermark: None,
        }
    }

    /// Create a page with standard A4 size (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Create a page with standard Letter size (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Set the margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the watermark picture.
    pub fn with_watermark(mut self, data: Vec<u8>) -> Self {
        self.watermark = Some(data);
        self
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::a4()
    }
}

/// One positioned component, in z-order, as produced by the report renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    /// Left edge relative to the page
    pub left: f32,
    /// Top edge relative to the page
    pub top: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,

    /// Component role
    #[serde(default)]
    pub role: ObjectRole,

    /// Visual attributes
    #[serde(default)]
    pub style: Style,

    /// Literal text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Picture bytes (images, or pre-rasterized rotated text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<Vec<u8>>,

    /// Hyperlink target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,

    /// Rotation angle in degrees
    #[serde(default)]
    pub rotation: i32,
}

impl ComponentInfo {
    /// Create a component with a role and default style.
    pub fn new(role: ObjectRole, left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            role,
            style: Style::default(),
            text: None,
            picture: None,
            hyperlink: None,
            rotation: 0,
        }
    }

    /// Create a text component.
    pub fn text(left: f32, top: f32, width: f32, height: f32, text: impl Into<String>) -> Self {
        let mut component = Self::new(ObjectRole::Text, left, top, width, height);
        component.text = Some(text.into());
        component
    }

    /// Create a line component. One of `width`/`height` is usually zero.
    pub fn line(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(ObjectRole::Line, left, top, width, height)
    }

    /// Create a shape component.
    pub fn shape(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(ObjectRole::Shape, left, top, width, height)
    }

    /// Create a band background component.
    pub fn band(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(ObjectRole::Band, left, top, width, height)
    }

    /// Create a picture component.
    pub fn picture(left: f32, top: f32, width: f32, height: f32, data: Vec<u8>) -> Self {
        let mut component = Self::new(ObjectRole::Picture, left, top, width, height);
        component.picture = Some(data);
        component
    }

    /// Set the style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the hyperlink target.
    pub fn with_hyperlink(mut self, url: impl Into<String>) -> Self {
        self.hyperlink = Some(url.into());
        self
    }

    /// Set the rotation angle.
    pub fn with_rotation(mut self, angle: i32) -> Self {
        self.rotation = angle;
        self
    }

    /// Attach picture bytes.
    pub fn with_picture(mut self, data: Vec<u8>) -> Self {
        self.picture = Some(data);
        self
    }

    /// Check that every coordinate is finite and non-negative.
    pub fn has_valid_geometry(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}
