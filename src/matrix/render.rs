//! Render pass: paint objects into the matrix in z-order.

use super::builder::{ExportMatrix, Stage, FILL_OBJECT};
use super::progress::Phase;
use crate::model::{GridRect, ObjectRole};

impl ExportMatrix {
    /// Close both axes and paint every object, later objects overwriting
    /// earlier ones.
    ///
    /// Runs once; further calls do nothing.
    pub fn render(&mut self) {
        if self.stage >= Stage::Rendered {
            return;
        }
        self.report(Phase::Rendering);
        self.size_fill_object();

        self.x_axis.close();
        self.y_axis.close();
        self.width = self.x_axis.len();
        self.height = self.y_axis.len();
        self.cells = vec![None; self.width * self.height];

        for id in 0..self.objects.len() {
            self.paint(id);
        }

        self.stage = Stage::Rendered;
        log::debug!(
            "ExportMatrix: rendered {} objects into {}x{} cells",
            self.objects.len(),
            self.width,
            self.height
        );
    }

    /// Size the background object to the used area (or the content bounds
    /// when cropping) and register its edges.
    fn size_fill_object(&mut self) {
        if !self.options.fill_area || self.objects.is_empty() {
            return;
        }
        let (left, top, right, bottom) = if self.options.crop_fill_area {
            self.objects[FILL_OBJECT + 1..]
                .iter()
                .map(|o| (o.left, o.top, o.right(), o.bottom()))
                .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
                .unwrap_or_default()
        } else {
            let zoom = self.options.zoom;
            (0.0, 0.0, self.pages.max_width(zoom), self.pages.next_offset())
        };

        let fill = &mut self.objects[FILL_OBJECT];
        fill.left = left;
        fill.top = top;
        fill.width = (right - left).max(0.0);
        fill.height = (bottom - top).max(0.0);
        if fill.width > 0.0 && fill.height > 0.0 {
            self.x_axis.add(left);
            self.x_axis.add(right);
            self.y_axis.add(top);
            self.y_axis.add(bottom);
        }
    }

    fn paint(&mut self, id: usize) {
        let obj = &self.objects[id];
        let style = &self.styles[obj.style];

        let plain_band = obj.role == ObjectRole::Band && style.is_plain_background();
        let empty_fill =
            self.options.fill_area && id == FILL_OBJECT && (obj.width <= 0.0 || obj.height <= 0.0);
        if plain_band || empty_fill {
            self.objects[id].resolved = true;
            return;
        }

        let x = self.x_axis.node_for(obj.left);
        let y = self.y_axis.node_for(obj.top);
        let span_x = self.x_axis.node_for(obj.right()).saturating_sub(x).max(1);
        let span_y = self.y_axis.node_for(obj.bottom()).saturating_sub(y).max(1);
        let grid = GridRect::new(x, y, span_x, span_y);

        let (base_style, fill, text_color) = (obj.style, style.fill, style.text_color);
        if fill.is_transparent() {
            let under = self.cells[self.cell_index(x, y)];
            if let Some(under) = under.filter(|&under| under != id) {
                let under_fill = self.styles[self.objects[under].style].fill;
                if !under_fill.is_transparent() && under_fill != text_color {
                    self.objects[id].style = self.styles.derive(base_style, |s| s.fill = under_fill);
                }
            }
        }

        self.objects[id].grid = grid;
        for (cx, cy) in grid.cells() {
            let index = self.cell_index(cx, cy);
            self.cells[index] = Some(id);
        }
    }
}
