//! Analyze pass: recover rectangles after overlap and split objects whose
//! visible remainder is not a single rectangle.

use std::mem;

use super::builder::{ExportMatrix, Stage};
use super::progress::Phase;
use crate::model::{GridObject, GridRect, Side};

impl ExportMatrix {
    /// Split every partly covered object into rectangular fragments.
    ///
    /// Renders first if needed. Runs once; further calls do nothing.
    pub fn analyze(&mut self) {
        if self.stage >= Stage::Analyzed {
            return;
        }
        self.render();
        self.report(Phase::Analyzing);

        let originals = self.objects.len();
        for y in 0..self.height {
            for x in 0..self.width {
                let Some(id) = self.cells[self.cell_index(x, y)] else {
                    continue;
                };
                if self.objects[id].resolved {
                    continue;
                }
                let rect = self.find_rect(x, y, id);
                if rect == self.objects[id].grid {
                    self.objects[id].resolved = true;
                } else {
                    self.split(id, rect);
                }
            }
        }
        self.rehome_orphaned_content(originals);

        self.stage = Stage::Analyzed;
        log::debug!(
            "ExportMatrix: analyzed grid, {} fragments created",
            self.objects.len() - originals
        );
    }

    /// Largest rectangle of cells owned by `id` whose top-left corner is
    /// `(x, y)`: grow right first, then down while the whole row matches.
    fn find_rect(&self, x: usize, y: usize, id: usize) -> GridRect {
        let owns = |cx: usize, cy: usize| self.cells[self.cell_index(cx, cy)] == Some(id);

        let mut right = x + 1;
        while right < self.width && owns(right, y) {
            right += 1;
        }
        let mut bottom = y + 1;
        while bottom < self.height && (x..right).all(|cx| owns(cx, bottom)) {
            bottom += 1;
        }
        GridRect::new(x, y, right - x, bottom - y)
    }

    /// Append a fragment of `id` covering `rect` and repoint its cells.
    fn split(&mut self, id: usize, rect: GridRect) -> usize {
        let tolerance = self.x_axis.tolerance();
        let original = &self.objects[id];

        let left = self.x_axis.position_clamped(rect.x);
        let top = self.y_axis.position_clamped(rect.y);
        let right = self
            .x_axis
            .position(rect.right())
            .unwrap_or_else(|| original.right())
            .max(left);
        let bottom = self
            .y_axis
            .position(rect.bottom())
            .unwrap_or_else(|| original.bottom())
            .max(top);

        // Sides of the fragment that lie on the original's outline keep
        // their border; inner cut edges lose it.
        let inner_sides: Vec<Side> = [
            (Side::Left, left, original.left),
            (Side::Top, top, original.top),
            (Side::Right, right, original.right()),
            (Side::Bottom, bottom, original.bottom()),
        ]
        .into_iter()
        .filter(|(_, edge, outline)| (edge - outline).abs() > tolerance)
        .map(|(side, _, _)| side)
        .collect();

        let keeps_content = !original.content.is_empty()
            && right - original.left > original.width / 3.0
            && bottom - original.top > original.height / 3.0;

        let role = original.role;
        let base_style = original.style;
        let style = if inner_sides.is_empty() {
            base_style
        } else {
            self.styles.derive(base_style, |s| {
                for side in &inner_sides {
                    s.border.set_side(*side, None);
                }
            })
        };
        let content = if keeps_content {
            mem::take(&mut self.objects[id].content)
        } else {
            Default::default()
        };

        let mut fragment = GridObject::new(left, top, right - left, bottom - top, role, style, content);
        fragment.grid = rect;
        fragment.resolved = true;
        fragment.parent = Some(id);

        let fragment_id = self.objects.len();
        self.objects.push(fragment);
        for (cx, cy) in rect.cells() {
            let index = self.cell_index(cx, cy);
            self.cells[index] = Some(fragment_id);
        }
        fragment_id
    }

    /// Hand the content of split originals that kept it to their largest
    /// fragment.
    fn rehome_orphaned_content(&mut self, originals: usize) {
        for id in 0..originals {
            let obj = &self.objects[id];
            if obj.resolved || obj.content.is_empty() {
                continue;
            }
            let largest = (originals..self.objects.len())
                .filter(|&f| self.objects[f].parent == Some(id))
                .max_by_key(|&f| self.objects[f].grid.area());
            match largest {
                Some(fragment) => {
                    log::debug!(
                        "ExportMatrix: moving content of object {} to fragment {}",
                        id,
                        fragment
                    );
                    self.objects[fragment].content = mem::take(&mut self.objects[id].content);
                }
                None => log::warn!("ExportMatrix: content of object {} is fully covered", id),
            }
        }
    }
}
