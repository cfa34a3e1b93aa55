//! JSON rendering of a finished grid.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::matrix::{ExportMatrix, Page};
use crate::model::{Content, GridRect, ObjectRole, Picture, Style};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serializable view of a prepared grid. Picture bytes are left out.
#[derive(Debug, Serialize)]
pub struct GridSnapshot<'a> {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Column line positions
    pub columns: &'a [f32],
    /// Row line positions
    pub rows: &'a [f32],
    /// Style table
    pub styles: &'a [Style],
    /// Pages with their break positions
    pub pages: &'a [Page],
    /// Picture metadata
    pub pictures: Vec<PictureEntry<'a>>,
    /// Objects that own cells
    pub objects: Vec<ObjectEntry<'a>>,
    /// Cell owners, row-major
    pub cells: Vec<Vec<Option<usize>>>,
}

/// Picture metadata in a snapshot.
#[derive(Debug, Serialize)]
pub struct PictureEntry<'a> {
    /// Picture id
    pub id: usize,
    /// Size of the data in bytes
    pub size: usize,
    /// Suggested file name
    pub filename: String,
    #[serde(flatten)]
    picture: &'a Picture,
}

/// A live object in a snapshot.
#[derive(Debug, Serialize)]
pub struct ObjectEntry<'a> {
    /// Object id
    pub id: usize,
    /// Role
    pub role: ObjectRole,
    /// Style index
    pub style: usize,
    /// Owned cells
    pub grid: GridRect,
    /// Text, hyperlink and picture payload
    #[serde(skip_serializing_if = "is_blank")]
    pub content: &'a Content,
    /// Object this one was split from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
}

fn is_blank(content: &&Content) -> bool {
    content.is_empty()
}

impl<'a> GridSnapshot<'a> {
    /// Capture a prepared grid.
    pub fn capture(matrix: &'a ExportMatrix) -> Result<Self> {
        if !matrix.is_prepared() {
            return Err(Error::NotPrepared);
        }

        let pictures = matrix
            .pictures()
            .enumerate()
            .map(|(id, picture)| PictureEntry {
                id,
                size: picture.size(),
                filename: picture.suggested_filename(id),
                picture,
            })
            .collect();

        let objects = matrix
            .live_objects()
            .into_iter()
            .filter_map(|id| {
                let object = matrix.object_at(id)?;
                Some(ObjectEntry {
                    id,
                    role: object.role,
                    style: object.style,
                    grid: object.grid,
                    content: &object.content,
                    parent: object.parent,
                })
            })
            .collect();

        let cells = (0..matrix.height())
            .map(|y| (0..matrix.width()).map(|x| matrix.cell(x, y)).collect())
            .collect();

        Ok(Self {
            width: matrix.width(),
            height: matrix.height(),
            columns: matrix.x_positions(),
            rows: matrix.y_positions(),
            styles: matrix.styles(),
            pages: matrix.pages(),
            pictures,
            objects,
            cells,
        })
    }
}

/// Convert a prepared grid to JSON.
pub fn to_json(matrix: &ExportMatrix, format: JsonFormat) -> Result<String> {
    let snapshot = GridSnapshot::capture(matrix)?;
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&snapshot),
        JsonFormat::Compact => serde_json::to_string(&snapshot),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MatrixOptions;
    use crate::model::{ComponentInfo, PageInfo};

    fn prepared() -> ExportMatrix {
        let mut matrix = ExportMatrix::new(MatrixOptions::new());
        matrix
            .add_page(
                &PageInfo::new(100.0, 50.0),
                &[
                    ComponentInfo::text(0.0, 0.0, 60.0, 20.0, "Invoice"),
                    ComponentInfo::picture(60.0, 0.0, 40.0, 20.0, b"\xFF\xD8\xFF\xE0logo".to_vec()),
                ],
            )
            .unwrap();
        matrix.prepare();
        matrix
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&prepared(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"Invoice\""));
        assert!(json.contains("image/jpeg"));
        assert!(json.contains("picture0.jpg"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&prepared(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["width"], 3);
        assert_eq!(value["objects"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(value["cells"][0][0], 0);
        assert!(value["pictures"][0].get("data").is_none());
    }

    #[test]
    fn test_unprepared_grid_rejected() {
        let matrix = ExportMatrix::default();
        assert!(matches!(to_json(&matrix, JsonFormat::Compact), Err(Error::NotPrepared)));
    }
}
