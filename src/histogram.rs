//! In-memory weighted histograms

use crate::{manager::HistogramRegistry, numeric::Float, Result};

use eyre::ensure;
use log::error;

/// One-dimensional histogram with regular bins
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// Name of the histogram
    pub name: String,

    /// Weighted bin contents
    pub bins: Vec<Float>,

    /// Sum of squared weights, per bin
    pub sum_weights2: Vec<Float>,

    /// Range covered by the bins, as [min, max[
    pub range: (Float, Float),

    /// Weighted content below the range
    pub underflow: Float,

    /// Weighted content above the range
    pub overflow: Float,

    /// Number of fills, including under- and overflows
    pub entries: u64,

    /// Sum of weight * value, used to compute the mean
    sum_weighted_values: Float,

    /// Sum of weights
    sum_weights: Float,
}
//
impl Histogram {
    /// Create a new histogram with a given number of bins over [min, max[
    pub fn new(name: &str, num_bins: usize, range: (Float, Float)) -> Result<Self> {
        ensure!(num_bins > 0, "Histogram {} must have at least one bin", name);
        ensure!(
            range.0 < range.1,
            "Histogram {} has an empty range [{}, {}[",
            name,
            range.0,
            range.1
        );
        Ok(Self {
            name: name.to_owned(),
            bins: vec![0.; num_bins],
            sum_weights2: vec![0.; num_bins],
            range,
            underflow: 0.,
            overflow: 0.,
            entries: 0,
            sum_weighted_values: 0.,
            sum_weights: 0.,
        })
    }

    /// Width of each bin
    pub fn bin_width(&self) -> Float {
        (self.range.1 - self.range.0) / self.bins.len() as Float
    }

    /// Bin edges, from the lower edge of the first bin to the upper edge of
    /// the last one
    pub fn bin_edges(&self) -> Vec<Float> {
        let width = self.bin_width();
        (0..=self.bins.len())
            .map(|i| self.range.0 + i as Float * width)
            .collect()
    }

    /// Add a weighted value to the histogram
    pub fn fill(&mut self, value: Float, weight: Float) {
        self.entries += 1;
        self.sum_weighted_values += weight * value;
        self.sum_weights += weight;
        if value >= self.range.0 && value < self.range.1 {
            let index = ((value - self.range.0) / self.bin_width()) as usize;
            // Rounding can push values right below max into a missing bin
            let index = index.min(self.bins.len() - 1);
            self.bins[index] += weight;
            self.sum_weights2[index] += weight * weight;
        } else if value >= self.range.1 {
            self.overflow += weight;
        } else {
            self.underflow += weight;
        }
    }

    /// Weighted integral of the in-range bins
    pub fn integral(&self) -> Float {
        self.bins.iter().sum()
    }

    /// Weighted mean of the filled values, if any
    pub fn mean(&self) -> Option<Float> {
        (self.sum_weights != 0.).then(|| self.sum_weighted_values / self.sum_weights)
    }
}

/// Collection of named histograms, in declaration order
#[derive(Clone, Debug, Default)]
pub struct HistogramSet {
    histograms: Vec<Histogram>,
    weight: Float,
}
//
impl HistogramSet {
    /// Set up an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over the histograms in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Histogram> {
        self.histograms.iter()
    }

    /// Look up a histogram by name
    pub fn get(&self, name: &str) -> Option<&Histogram> {
        self.histograms.iter().find(|histo| histo.name == name)
    }
}

impl HistogramRegistry for HistogramSet {
    fn add_histogram(&mut self, name: &str, bins: usize, min: Float, max: Float) -> Result<()> {
        ensure!(
            self.get(name).is_none(),
            "Histogram {} is declared twice",
            name
        );
        self.histograms.push(Histogram::new(name, bins, (min, max))?);
        Ok(())
    }

    fn begin_event(&mut self, weight: Float) {
        self.weight = weight;
    }

    fn fill(&mut self, name: &str, value: Float) {
        let weight = self.weight;
        match self.histograms.iter_mut().find(|histo| histo.name == name) {
            Some(histo) => histo.fill(value, weight),
            None => error!("Histogram {} was filled without being declared", name),
        }
    }
}
