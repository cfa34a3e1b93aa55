//! Placed objects: the rectangles the grid is built from.

use serde::{Deserialize, Serialize};

/// What a placed object represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectRole {
    /// A text box
    #[default]
    Text,
    /// A horizontal or vertical line
    Line,
    /// A rectangle or other filled shape
    Shape,
    /// A band background
    Band,
    /// An image
    Picture,
}

impl ObjectRole {
    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectRole::Text => "text",
            ObjectRole::Line => "line",
            ObjectRole::Shape => "shape",
            ObjectRole::Band => "band",
            ObjectRole::Picture => "picture",
        }
    }
}

impl std::fmt::Display for ObjectRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangle of grid cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    /// First column
    pub x: usize,
    /// First row
    pub y: usize,
    /// Number of columns
    pub span_x: usize,
    /// Number of rows
    pub span_y: usize,
}

impl GridRect {
    /// Create a grid rectangle.
    pub fn new(x: usize, y: usize, span_x: usize, span_y: usize) -> Self {
        Self {
            x,
            y,
            span_x,
            span_y,
        }
    }

    /// Column just past the right edge.
    pub fn right(&self) -> usize {
        self.x + self.span_x
    }

    /// Row just past the bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.span_y
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.span_x * self.span_y
    }

    /// Check if a cell lies inside the rectangle.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Iterate over every `(x, y)` cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}

/// Content carried by an object. Exactly one piece of a split object keeps it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Literal text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Hyperlink target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,

    /// Picture id in the builder's picture store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<usize>,
}

impl Content {
    /// Check if there is nothing to carry.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.hyperlink.is_none() && self.picture.is_none()
    }
}

/// An object placed in the shared coordinate space.
#[derive(Debug, Clone, Serialize)]
pub struct GridObject {
    /// Left edge (absolute, zoomed)
    pub left: f32,
    /// Top edge (absolute, zoomed, page offset applied)
    pub top: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
    /// Object role
    pub role: ObjectRole,
    /// Index into the style table
    pub style: usize,
    /// Text, hyperlink and picture payload
    pub content: Content,
    /// Resolved grid rectangle
    pub grid: GridRect,
    /// Whether the grid rectangle is final
    #[serde(skip)]
    pub resolved: bool,
    /// Object this one was split from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
}

impl GridObject {
    /// Create an unresolved object.
    pub fn new(
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        role: ObjectRole,
        style: usize,
        content: Content,
    ) -> Self {
        Self {
            left,
            top,
            width,
            height,
            role,
            style,
            content,
            grid: GridRect::default(),
            resolved: false,
            parent: None,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Check if the object renders as text.
    pub fn is_text(&self) -> bool {
        self.role == ObjectRole::Text
    }

    /// The literal text (empty when none).
    pub fn text(&self) -> &str {
        &self.content.text
    }

    /// Check if the object is a split fragment.
    pub fn is_fragment(&self) -> bool {
        self.parent.is_some()
    }
}
