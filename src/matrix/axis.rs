//! Tolerance-merged coordinate axis.
//!
//! While open, breakpoints live in an ordered set so insertion and the
//! tolerance lookup are both O(log n). Closing freezes them into a sorted
//! vector (optionally densified by a maximum node distance) that is searched
//! with a binary partition.

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Smallest accepted node distance cap, in points.
const MIN_MAX_DISTANCE: f32 = 1.0;

/// Total-ordered wrapper so breakpoints can live in a `BTreeSet`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Breakpoint(f32);

impl Eq for Breakpoint {}

impl PartialOrd for Breakpoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Breakpoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// One dimension's sorted, deduplicated set of breakpoints.
#[derive(Debug, Clone)]
pub struct CoordinateAxis {
    tolerance: f32,
    max_distance: Option<f32>,
    open: BTreeSet<Breakpoint>,
    nodes: Vec<f32>,
    closed: bool,
}

impl CoordinateAxis {
    /// Create an axis holding only the origin.
    pub fn new(tolerance: f32) -> Self {
        let mut open = BTreeSet::new();
        open.insert(Breakpoint(0.0));
        Self {
            tolerance: tolerance.max(0.0),
            max_distance: None,
            open,
            nodes: Vec::new(),
            closed: false,
        }
    }

    /// Cap the distance between adjacent nodes; extra nodes are added at close.
    ///
    /// The cap never drops below the merge tolerance or `MIN_MAX_DISTANCE`.
    pub fn with_max_distance(mut self, max_distance: Option<f32>) -> Self {
        self.max_distance = max_distance
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d.max(self.tolerance).max(MIN_MAX_DISTANCE));
        self
    }

    /// The merge tolerance.
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Insert a breakpoint. Returns `true` if a new node was created and
    /// `false` if an existing node within tolerance absorbed it.
    ///
    /// # Panics
    ///
    /// Panics if the axis is already closed.
    pub fn add(&mut self, value: f32) -> bool {
        assert!(!self.closed, "breakpoint {value} added to a closed axis");

        let low = Breakpoint(value - self.tolerance);
        let high = Breakpoint(value + self.tolerance);
        if self.open.range(low..=high).next().is_some() {
            return false;
        }
        self.open.insert(Breakpoint(value))
    }

    /// Freeze the axis. Further `add` calls are a logic error.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        let raw: Vec<f32> = std::mem::take(&mut self.open).into_iter().map(|b| b.0).collect();

        self.nodes = match self.max_distance {
            Some(max) => densify(&raw, max),
            None => raw,
        };
        self.closed = true;
        log::debug!(
            "CoordinateAxis: closed with {} nodes (tolerance {})",
            self.nodes.len(),
            self.tolerance
        );
    }

    /// Check if the axis has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Index of the node nearest to `value` within tolerance.
    ///
    /// Only meaningful once the axis is closed; returns `None` before that.
    pub fn index_of(&self, value: f32) -> Option<usize> {
        if !self.closed {
            return None;
        }
        let start = self.nodes.partition_point(|&node| node < value - self.tolerance);
        self.nodes[start..]
            .iter()
            .take_while(|&&node| node <= value + self.tolerance)
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - value)
                    .abs()
                    .partial_cmp(&(*b - value).abs())
                    .unwrap_or(Ordering::Equal)
            })
            .map(|(offset, _)| start + offset)
    }

    /// Index of an edge that was inserted before close.
    ///
    /// # Panics
    ///
    /// Panics if the value has no node: every placed edge is registered on
    /// the axis, so a miss means the object store and the axis disagree.
    pub fn node_for(&self, value: f32) -> usize {
        match self.index_of(value) {
            Some(index) => index,
            None => panic!(
                "coordinate {value} has no axis node (closed: {}, tolerance: {})",
                self.closed, self.tolerance
            ),
        }
    }

    /// Index of the node whose cell contains `value` (the last node at or
    /// before it).
    pub fn cell_containing(&self, value: f32) -> Option<usize> {
        if !self.closed || value < 0.0 {
            return None;
        }
        self.nodes
            .partition_point(|&node| node <= value)
            .checked_sub(1)
    }

    /// Position of node `index`.
    pub fn position(&self, index: usize) -> Option<f32> {
        self.nodes.get(index).copied()
    }

    /// Position of node `index`, clamped to the last node.
    pub fn position_clamped(&self, index: usize) -> f32 {
        let last = self.nodes.len().saturating_sub(1);
        self.nodes.get(index.min(last)).copied().unwrap_or(0.0)
    }

    /// All node positions (empty until closed).
    pub fn nodes(&self) -> &[f32] {
        &self.nodes
    }

    /// Number of nodes (open breakpoints before close).
    pub fn len(&self) -> usize {
        if self.closed {
            self.nodes.len()
        } else {
            self.open.len()
        }
    }

    /// Check if the axis has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reset to an open axis holding only the origin.
    pub fn clear(&mut self) {
        self.open.clear();
        self.open.insert(Breakpoint(0.0));
        self.nodes.clear();
        self.closed = false;
    }
}

/// Insert evenly spaced nodes into gaps wider than `max`.
fn densify(nodes: &[f32], max: f32) -> Vec<f32> {
    let mut result = Vec::with_capacity(nodes.len());
    for pair in nodes.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        result.push(from);
        let gap = to - from;
        if gap > max {
            let pieces = (gap / max).ceil() as usize;
            let step = gap / pieces as f32;
            result.extend((1..pieces).map(|i| from + step * i as f32));
        }
    }
    if let Some(&last) = nodes.last() {
        result.push(last);
    }
    result
}
