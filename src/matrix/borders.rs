//! Border optimization: drop a Top or Left border when the neighbour across
//! the shared edge already draws the same stroke.

use super::builder::ExportMatrix;
use super::progress::Phase;
use crate::model::{BorderLine, Side};

impl ExportMatrix {
    /// Clear duplicated Top and Left borders. Returns the number of sides
    /// cleared.
    ///
    /// Analyzes first if needed. Running it again clears nothing new.
    pub fn optimize_borders(&mut self) -> usize {
        self.analyze();
        self.report(Phase::OptimizingBorders);

        let mut cleared = 0;
        for id in self.live_objects() {
            let style = &self.styles[self.objects[id].style];
            let clear_top = style
                .border
                .top
                .is_some_and(|line| self.edge_duplicated(id, Side::Top, &line));
            let clear_left = style
                .border
                .left
                .is_some_and(|line| self.edge_duplicated(id, Side::Left, &line));
            if !clear_top && !clear_left {
                continue;
            }

            let base = self.objects[id].style;
            self.objects[id].style = self.styles.derive(base, |s| {
                if clear_top {
                    s.border.top = None;
                }
                if clear_left {
                    s.border.left = None;
                }
            });
            cleared += usize::from(clear_top) + usize::from(clear_left);
        }

        log::debug!("ExportMatrix: cleared {} duplicated border sides", cleared);
        cleared
    }

    /// Check that every cell across `side` of `id` belongs to an object
    /// drawing the same stroke on the facing side.
    fn edge_duplicated(&self, id: usize, side: Side, line: &BorderLine) -> bool {
        let rect = self.objects[id].grid;
        let neighbours: Vec<Option<usize>> = match side {
            Side::Top if rect.y > 0 => (rect.x..rect.right())
                .map(|x| self.cell(x, rect.y - 1))
                .collect(),
            Side::Left if rect.x > 0 => (rect.y..rect.bottom())
                .map(|y| self.cell(rect.x - 1, y))
                .collect(),
            _ => return false,
        };

        neighbours.iter().all(|neighbour| {
            neighbour
                .and_then(|n| self.styles[self.objects[n].style].border.side(side.opposite()))
                .is_some_and(|facing| facing.same_stroke(line))
        })
    }
}
