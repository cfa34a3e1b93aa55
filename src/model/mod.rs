//! Model types shared by the grid engine and its consumers.
//!
//! Input types (`PageInfo`, `ComponentInfo`) describe what the layout
//! producer hands over; `GridObject` and `Style` are what the engine stores
//! and exposes after placement.

mod object;
mod page;
mod picture;
mod style;

pub use object::{Content, GridObject, GridRect, ObjectRole};
pub use page::{ComponentInfo, Margins, PageInfo};
pub use picture::{digest_hex, picture_digest, Picture, PictureDigest, PictureStore};
pub use style::{
    Border, BorderLine, Color, Font, HorizontalAlign, LineStyle, Padding, Side, Style,
    VerticalAlign,
};
