//! In-memory cut-flow bookkeeping

use crate::{manager::CutRegistry, numeric::Float, Result};

use eyre::ensure;
use log::error;

/// Weighted event counter
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Counter {
    /// Number of events
    pub entries: u64,

    /// Sum of event weights
    pub sum_weights: Float,

    /// Sum of squared event weights
    pub sum_weights2: Float,
}
//
impl Counter {
    /// Account for one event
    pub fn increment(&mut self, weight: Float) {
        self.entries += 1;
        self.sum_weights += weight;
        self.sum_weights2 += weight * weight;
    }
}

/// Counters associated with one named cut
#[derive(Clone, Debug, PartialEq)]
pub struct CutCounter {
    /// Name of the cut
    pub name: String,

    /// Events on which the cut was evaluated
    pub evaluated: Counter,

    /// Events which passed the cut
    pub passed: Counter,
}
//
impl CutCounter {
    /// Fraction of the evaluated (weighted) events which passed the cut
    pub fn efficiency(&self) -> Option<Float> {
        (self.evaluated.sum_weights != 0.)
            .then(|| self.passed.sum_weights / self.evaluated.sum_weights)
    }
}

/// Ordered cut-flow table
#[derive(Clone, Debug, Default)]
pub struct CutFlow {
    /// Declared analysis regions
    regions: Vec<String>,

    /// Declared cuts, in declaration order
    cuts: Vec<CutCounter>,

    /// Every event that was handed to `begin_event`
    initial: Counter,

    /// Weight of the event being processed
    weight: Float,
}
//
impl CutFlow {
    /// Set up an empty cut-flow
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared analysis regions
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Cut counters, in declaration order
    pub fn cuts(&self) -> &[CutCounter] {
        &self.cuts
    }

    /// Counter of all processed events
    pub fn initial(&self) -> &Counter {
        &self.initial
    }

    /// Look up the counters of a cut by name
    pub fn cut(&self, name: &str) -> Option<&CutCounter> {
        self.cuts.iter().find(|cut| cut.name == name)
    }
}

impl CutRegistry for CutFlow {
    fn add_region(&mut self, name: &str) -> Result<()> {
        ensure!(
            !self.regions.iter().any(|region| region == name),
            "Region {} is declared twice",
            name
        );
        self.regions.push(name.to_owned());
        Ok(())
    }

    fn add_cut(&mut self, name: &str) -> Result<()> {
        ensure!(self.cut(name).is_none(), "Cut {} is declared twice", name);
        self.cuts.push(CutCounter {
            name: name.to_owned(),
            evaluated: Counter::default(),
            passed: Counter::default(),
        });
        Ok(())
    }

    fn begin_event(&mut self, weight: Float) {
        self.weight = weight;
        self.initial.increment(weight);
    }

    fn apply_cut(&mut self, condition: bool, name: &str) -> bool {
        let weight = self.weight;
        match self.cuts.iter_mut().find(|cut| cut.name == name) {
            Some(cut) => {
                cut.evaluated.increment(weight);
                if condition {
                    cut.passed.increment(weight);
                }
            }
            None => error!("Cut {} was applied without being declared", name),
        }
        condition
    }
}
