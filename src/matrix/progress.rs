//! Coarse progress reporting for an external indicator.

use std::fmt;

/// The phase the builder is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A page of components was placed
    Placing,
    /// Painting objects into the matrix
    Rendering,
    /// Splitting overlapped objects into rectangles
    Analyzing,
    /// Removing duplicated borders
    OptimizingBorders,
    /// The grid is ready
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Phase::Placing => "Placing objects",
            Phase::Rendering => "Rendering grid",
            Phase::Analyzing => "Analyzing overlaps",
            Phase::OptimizingBorders => "Optimizing borders",
            Phase::Done => "Done",
        };
        f.write_str(message)
    }
}

/// A progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Current phase
    pub phase: Phase,
    /// Pages processed so far
    pub current_page: usize,
    /// Pages known to the builder
    pub total_pages: usize,
}

/// Observer invoked between phases. It cannot influence the result.
pub type ProgressCallback = Box<dyn FnMut(&Progress) + Send>;
