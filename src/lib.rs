//! test_cms: a CMS-style event selection
//!
//!
//! # Introduction (for the physicist)
//!
//! This analysis looks for events with two isolated photons and missing
//! transverse momentum (MET). Signal photons are sorted by transverse
//! momentum, the leading pair must form a light diphoton which recoils
//! against the MET, hard jets must stay away from the MET, and the event
//! finally lands in a low or high MET signal region whose MET histogram
//! gets filled.
//!
//! Along the way, control histograms of the MET are filled for events with
//! a lepton close to a hadronic tau, or with a close pair of taus.
//!
//!
//! # Introduction (for the computer guy)
//!
//! The selection itself lives in `selection`, and talks to its environment
//! through the cut and histogram registries of `manager`. The driver program
//! feeds it with toy events from `evgen`, bookkeeps the outcome with
//! `cutflow` and `histogram`, then prints everything out via `output`.

#![warn(missing_docs)]

pub mod config;
pub mod cutflow;
pub mod event;
pub mod evgen;
pub mod histogram;
pub mod isolation;
pub mod manager;
pub mod momentum;
pub mod numeric;
pub mod output;
pub mod random;
pub mod selection;

#[cfg(test)]
mod testing;

/// We'll use eyre's type-erased result type throughout the crate
pub type Result<T> = eyre::Result<T>;
