//! Layout interchange: a whole multi-page layout as one serde document.
//!
//! This is the boundary to the layout producer, so geometry is validated
//! here before any of it reaches the grid builder.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::{ExportMatrix, MatrixOptions};
use crate::model::{ComponentInfo, PageInfo};
use crate::render::JsonFormat;

/// One page and its components in z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPage {
    /// Page geometry
    pub page: PageInfo,

    /// Components, bottom-most first
    #[serde(default)]
    pub components: Vec<ComponentInfo>,
}

/// A complete layout handed over by the producer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Pages in order
    #[serde(default)]
    pub pages: Vec<LayoutPage>,
}

impl Layout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn with_page(mut self, page: PageInfo, components: Vec<ComponentInfo>) -> Self {
        self.pages.push(LayoutPage { page, components });
        self
    }

    /// Parse a layout from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a layout from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a layout from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::debug!("Layout: loading {}", path.as_ref().display());
        Self::from_reader(BufReader::new(file))
    }

    /// Serialize the layout to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self)?,
            JsonFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of components across all pages.
    pub fn component_count(&self) -> usize {
        self.pages.iter().map(|p| p.components.len()).sum()
    }

    /// Reject non-finite or negative geometry.
    pub fn validate(&self) -> Result<()> {
        self.pages
            .iter()
            .enumerate()
            .try_for_each(|(page_index, entry)| {
                validate_page(page_index, &entry.page, &entry.components)
            })
    }

    /// Add every page to a builder.
    pub fn feed(&self, matrix: &mut ExportMatrix) -> Result<()> {
        self.validate()?;
        matrix.expect_pages(matrix.page_count() + self.pages.len());
        for entry in &self.pages {
            matrix.add_page(&entry.page, &entry.components)?;
        }
        Ok(())
    }
}

/// Check one page and its components. `page_index` is 0-based.
pub(crate) fn validate_page(
    page_index: usize,
    page: &PageInfo,
    components: &[ComponentInfo],
) -> Result<()> {
    let size_ok = [page.width, page.height]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0);
    if !size_ok {
        return Err(Error::InvalidGeometry(format!(
            "page {}: size {}x{}",
            page_index + 1,
            page.width,
            page.height
        )));
    }

    for (index, component) in components.iter().enumerate() {
        if !component.has_valid_geometry() {
            return Err(Error::InvalidGeometry(format!(
                "page {}, component {}: ({}, {}) {}x{}",
                page_index + 1,
                index + 1,
                component.left,
                component.top,
                component.width,
                component.height
            )));
        }
    }
    Ok(())
}

/// Build and prepare a grid from a layout.
pub fn build_matrix(layout: &Layout, options: MatrixOptions) -> Result<ExportMatrix> {
    let mut matrix = ExportMatrix::new(options);
    layout.feed(&mut matrix)?;
    matrix.prepare();
    Ok(matrix)
}
