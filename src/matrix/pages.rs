//! Page list: per-page geometry plus the cumulative page break positions.

use serde::Serialize;

use crate::model::{Margins, PageInfo};

/// A registered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Page width as given by the producer
    pub width: f32,
    /// Page height as given by the producer
    pub height: f32,
    /// Page margins
    pub margins: Margins,
    /// Landscape orientation
    pub landscape: bool,
    /// Watermark picture id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<usize>,
    /// Top of the page in the shared (zoomed) coordinate space
    pub offset_y: f32,
    /// Bottom of the page in the shared (zoomed) coordinate space
    pub break_y: f32,
}

/// Ordered pages stacked vertically in one coordinate space.
#[derive(Debug, Clone, Default)]
pub struct PageList {
    pages: Vec<Page>,
}

impl PageList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertical offset at which the next page starts.
    pub fn next_offset(&self) -> f32 {
        self.pages.last().map(|p| p.break_y).unwrap_or(0.0)
    }

    /// Append a page and return its index.
    pub fn push(&mut self, info: &PageInfo, zoom: f32, watermark: Option<usize>) -> usize {
        let offset_y = self.next_offset();
        self.pages.push(Page {
            width: info.width,
            height: info.height,
            margins: info.margins,
            landscape: info.landscape,
            watermark,
            offset_y,
            break_y: offset_y + info.height * zoom,
        });
        self.pages.len() - 1
    }

    /// Get a page by index.
    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no page was added.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in order.
    pub fn as_slice(&self) -> &[Page] {
        &self.pages
    }

    /// Widest page, in zoomed units.
    pub fn max_width(&self, zoom: f32) -> f32 {
        self.pages
            .iter()
            .map(|p| p.width * zoom)
            .fold(0.0, f32::max)
    }

    /// Remove every page.
    pub fn clear(&mut self) {
        self.pages.clear();
    }
}
