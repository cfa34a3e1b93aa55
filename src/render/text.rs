//! Plain text dump of a finished grid, for debugging.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::matrix::ExportMatrix;

/// Render cell ownership and the live objects as plain text.
pub fn to_text(matrix: &ExportMatrix) -> Result<String> {
    if !matrix.is_prepared() {
        return Err(Error::NotPrepared);
    }
    let mut output = String::new();
    write_grid(matrix, &mut output).map_err(|e| Error::Render(e.to_string()))?;
    Ok(output)
}

fn write_grid(matrix: &ExportMatrix, out: &mut String) -> std::fmt::Result {
    let live = matrix.live_objects();
    writeln!(
        out,
        "Grid {}x{}, {} objects, {} pages",
        matrix.width(),
        matrix.height(),
        live.len(),
        matrix.page_count()
    )?;

    let cell_width = matrix
        .object_count()
        .saturating_sub(1)
        .to_string()
        .len()
        .max(1)
        + 2;
    let breaks: Vec<f32> = (0..matrix.page_count())
        .filter_map(|page| matrix.page_break_y(page))
        .collect();

    for y in 0..matrix.height() {
        let top = matrix.axis_y_position(y).unwrap_or(0.0);
        if y > 0 && breaks.contains(&top) {
            writeln!(out, "{:-<1$}", "", 10 + cell_width * matrix.width())?;
        }
        write!(out, "{:>8.1} |", top)?;
        for x in 0..matrix.width() {
            match matrix.cell(x, y) {
                Some(id) => write!(out, "{:>1$}", format!("#{}", id), cell_width)?,
                None => write!(out, "{:>1$}", ".", cell_width)?,
            }
        }
        out.push('\n');
    }

    out.push('\n');
    for id in live {
        let Some(object) = matrix.object_at(id) else {
            continue;
        };
        let grid = object.grid;
        write!(
            out,
            "#{} {} [{},{} {}x{}]",
            id, object.role, grid.x, grid.y, grid.span_x, grid.span_y
        )?;
        if let Some(parent) = object.parent {
            write!(out, " from #{}", parent)?;
        }
        if !object.text().is_empty() {
            write!(out, " {:?}", object.text())?;
        }
        if let Some(picture) = object.content.picture {
            write!(out, " picture {}", picture)?;
        }
        out.push('\n');
    }
    Ok(())
}
