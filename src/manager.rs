//! Interfaces through which an analysis records its results
//!
//! The selection never owns its bookkeeping: it is handed a cut registry and
//! a histogram registry, and only talks to them through these traits.

use crate::{numeric::Float, Result};

/// Bookkeeping of named cuts (and of the analysis regions they apply to)
pub trait CutRegistry {
    /// Declare an analysis region
    fn add_region(&mut self, name: &str) -> Result<()>;

    /// Declare a cut. Cuts are reported in declaration order.
    fn add_cut(&mut self, name: &str) -> Result<()>;

    /// Start accounting for a new event of a given weight
    fn begin_event(&mut self, weight: Float);

    /// Record the outcome of a named cut for the current event
    ///
    /// Returns `condition` unchanged, so that this can be used inline.
    ///
    fn apply_cut(&mut self, condition: bool, name: &str) -> bool;
}

/// Bookkeeping of named histograms
pub trait HistogramRegistry {
    /// Declare a histogram with `bins` regular bins over [min, max[
    fn add_histogram(&mut self, name: &str, bins: usize, min: Float, max: Float) -> Result<()>;

    /// Start accounting for a new event of a given weight
    fn begin_event(&mut self, weight: Float);

    /// Fill a histogram, using the current event weight
    fn fill(&mut self, name: &str, value: Float);
}
