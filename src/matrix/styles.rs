//! Style table: structural interning of styles.

use std::collections::HashMap;
use std::ops::Index;

use crate::model::Style;

/// Registry of distinct styles, referenced by index.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    styles: Vec<Style>,
    lookup: HashMap<Style, usize>,
}

impl StyleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `style`, registering it if it is new.
    pub fn intern(&mut self, style: Style) -> usize {
        if let Some(&index) = self.lookup.get(&style) {
            return index;
        }
        let index = self.styles.len();
        self.lookup.insert(style.clone(), index);
        self.styles.push(style);
        index
    }

    /// Intern a variant of the style at `base`, produced by `edit`.
    pub fn derive(&mut self, base: usize, edit: impl FnOnce(&mut Style)) -> usize {
        let mut style = self.styles[base].clone();
        edit(&mut style);
        self.intern(style)
    }

    /// Get a style by index.
    pub fn get(&self, index: usize) -> Option<&Style> {
        self.styles.get(index)
    }

    /// Number of distinct styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// All styles in index order.
    pub fn as_slice(&self) -> &[Style] {
        &self.styles
    }

    /// Remove every style.
    pub fn clear(&mut self) {
        self.styles.clear();
        self.lookup.clear();
    }
}

impl Index<usize> for StyleTable {
    type Output = Style;

    fn index(&self, index: usize) -> &Style {
        &self.styles[index]
    }
}
