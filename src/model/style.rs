//! Visual style types: colors, borders, fonts and alignment.
//!
//! Styles are compared structurally so that the style table can intern them.
//! Float fields take part in hashing through their bit patterns (with `-0.0`
//! folded into `0.0`), which keeps `Hash` consistent with the derived
//! `PartialEq` for the finite values the engine works with.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Hash an `f32` so that values comparing equal hash equally.
fn hash_f32<H: Hasher>(value: f32, state: &mut H) {
    (value + 0.0).to_bits().hash(state);
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (0 = fully transparent)
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    /// Fully transparent color.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Check if the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Dash pattern of a border line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    /// Continuous line
    #[default]
    Solid,
    /// Dashed line
    Dash,
    /// Dotted line
    Dot,
    /// Dash-dot pattern
    DashDot,
    /// Dash-dot-dot pattern
    DashDotDot,
    /// Double line
    Double,
}

/// One side of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left edge
    Left,
    /// Top edge
    Top,
    /// Right edge
    Right,
    /// Bottom edge
    Bottom,
}

impl Side {
    /// All four sides in a fixed order.
    pub const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];

    /// The side facing this one across a shared edge.
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
        }
    }
}

/// A single border stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderLine {
    /// Stroke color
    pub color: Color,
    /// Stroke width in points
    pub width: f32,
    /// Dash pattern
    #[serde(default)]
    pub style: LineStyle,
}

impl BorderLine {
    /// Create a solid border line.
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: LineStyle::Solid,
        }
    }

    /// Check if two strokes would render as the same edge (width and color).
    pub fn same_stroke(&self, other: &BorderLine) -> bool {
        self.color == other.color && self.width == other.width
    }
}

impl Eq for BorderLine {}

impl Hash for BorderLine {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.color.hash(state);
        hash_f32(self.width, state);
        self.style.hash(state);
    }
}

/// Per-side borders. A missing side is not drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    /// Left side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderLine>,
    /// Top side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderLine>,
    /// Right side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderLine>,
    /// Bottom side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderLine>,
}

impl Border {
    /// No border at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// The same line on every side.
    pub fn all(line: BorderLine) -> Self {
        Self {
            left: Some(line),
            top: Some(line),
            right: Some(line),
            bottom: Some(line),
        }
    }

    /// Get the line on one side.
    pub fn side(&self, side: Side) -> Option<BorderLine> {
        match side {
            Side::Left => self.left,
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
        }
    }

    /// Set or clear the line on one side.
    pub fn set_side(&mut self, side: Side, line: Option<BorderLine>) {
        match side {
            Side::Left => self.left = line,
            Side::Top => self.top = line,
            Side::Right => self.right = line,
            Side::Bottom => self.bottom = line,
        }
    }

    /// Copy of this border with one side removed.
    pub fn without(mut self, side: Side) -> Self {
        self.set_side(side, None);
        self
    }

    /// Check if no side is drawn.
    pub fn is_empty(&self) -> bool {
        Side::ALL.iter().all(|&side| self.side(side).is_none())
    }

    /// Width of the widest drawn side, if any.
    pub fn widest(&self) -> Option<f32> {
        Side::ALL
            .iter()
            .filter_map(|&side| self.side(side))
            .map(|line| line.width)
            .reduce(f32::max)
    }
}

/// Font attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    /// Font family name
    pub name: String,
    /// Size in points
    pub size: f32,
    /// Bold weight
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Underline
    pub underline: bool,
    /// Strikeout
    pub strikeout: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: "Arial".to_string(),
            size: 10.0,
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
        }
    }
}

impl Eq for Font {}

impl Hash for Font {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        hash_f32(self.size, state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strikeout.hash(state);
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    /// Left aligned
    #[default]
    Left,
    /// Centered
    Center,
    /// Right aligned
    Right,
    /// Justified
    Justify,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Top aligned
    #[default]
    Top,
    /// Centered
    Center,
    /// Bottom aligned
    Bottom,
}

/// Inner padding in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Left padding
    pub left: f32,
    /// Top padding
    pub top: f32,
    /// Right padding
    pub right: f32,
    /// Bottom padding
    pub bottom: f32,
}

impl Eq for Padding {}

impl Hash for Padding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_f32(self.left, state);
        hash_f32(self.top, state);
        hash_f32(self.right, state);
        hash_f32(self.bottom, state);
    }
}

/// A complete visual style for one grid object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Borders
    pub border: Border,
    /// Background fill
    pub fill: Color,
    /// Text color
    pub text_color: Color,
    /// Font attributes
    pub font: Font,
    /// Horizontal alignment
    pub h_align: HorizontalAlign,
    /// Vertical alignment
    pub v_align: VerticalAlign,
    /// Inner padding
    pub padding: Padding,
    /// Text rotation in degrees
    pub angle: i32,
    /// Whether text wraps inside the cell
    pub word_wrap: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            border: Border::none(),
            fill: Color::TRANSPARENT,
            text_color: Color::BLACK,
            font: Font::default(),
            h_align: HorizontalAlign::Left,
            v_align: VerticalAlign::Top,
            padding: Padding::default(),
            angle: 0,
            word_wrap: true,
        }
    }
}

impl Style {
    /// Create a default style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fill color.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    /// Set the border.
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Set the text color.
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Set the font.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Set both alignments.
    pub fn with_alignment(mut self, h_align: HorizontalAlign, v_align: VerticalAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    /// Set the rotation angle.
    pub fn with_angle(mut self, angle: i32) -> Self {
        self.angle = angle;
        self
    }

    /// Check if this is an undecorated background: default fill and no border.
    pub fn is_plain_background(&self) -> bool {
        self.fill == Style::default().fill && self.border.is_empty()
    }

    /// Copy with every text-related attribute reset to its default.
    pub fn without_text_attributes(&self) -> Self {
        let defaults = Style::default();
        Self {
            text_color: defaults.text_color,
            font: defaults.font,
            h_align: defaults.h_align,
            v_align: defaults.v_align,
            padding: defaults.padding,
            angle: defaults.angle,
            word_wrap: defaults.word_wrap,
            ..self.clone()
        }
    }
}
