//! Test helpers: object builders and recording fakes of the registries

#![allow(missing_docs)]

use crate::{
    event::{ObjectKind, PhysicsObject, RecEvent},
    isolation::{IsolationCalculator, IsolationComponent},
    manager::{CutRegistry, HistogramRegistry},
    momentum::{from_pt_eta_phi_m, Momentum},
    numeric::Float,
    Result,
};

/// Route log output through the test harness
pub fn setup_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn object(kind: ObjectKind, pt: Float, eta: Float, phi: Float, mass: Float) -> PhysicsObject {
    PhysicsObject::new(kind, from_pt_eta_phi_m(pt, eta, phi, mass))
}

pub fn photon(pt: Float, eta: Float, phi: Float) -> PhysicsObject {
    object(ObjectKind::Photon, pt, eta, phi, 0.)
}

pub fn electron(pt: Float, eta: Float, phi: Float) -> PhysicsObject {
    object(ObjectKind::Electron, pt, eta, phi, 0.000511)
}

pub fn muon(pt: Float, eta: Float, phi: Float) -> PhysicsObject {
    object(ObjectKind::Muon, pt, eta, phi, 0.106)
}

pub fn tau(pt: Float, eta: Float, phi: Float) -> PhysicsObject {
    object(ObjectKind::Tau, pt, eta, phi, 1.777)
}

pub fn jet(pt: Float, eta: Float, phi: Float) -> PhysicsObject {
    object(ObjectKind::Jet, pt, eta, phi, 5.)
}

/// Missing transverse momentum of a given magnitude and direction
pub fn met(pt: Float, phi: Float) -> Momentum {
    from_pt_eta_phi_m(pt, 0., phi, 0.)
}

/// Isolation calculator which always returns the same sums
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedIsolation {
    pub track: Float,
    pub neutral: Float,
    pub photon: Float,
}
//
impl IsolationCalculator for FixedIsolation {
    fn sum_isolation(
        &self,
        _object: &Momentum,
        _rec: &RecEvent,
        _cone: Float,
        _veto: Float,
        component: IsolationComponent,
    ) -> Float {
        match component {
            IsolationComponent::Track => self.track,
            IsolationComponent::Neutral => self.neutral,
            IsolationComponent::Photon => self.photon,
            IsolationComponent::All => self.track + self.neutral + self.photon,
        }
    }
}

/// Registry call, as seen by a Recorder
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    AddRegion(String),
    AddCut(String),
    AddHistogram(String, usize, Float, Float),
    BeginEvent(Float),
    ApplyCut(String, bool),
    Fill(String, Float),
}

/// Fake cut and histogram registry which records every call
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}
//
impl Recorder {
    /// Cuts that were applied, in order, with their outcome
    pub fn applied_cuts(&self) -> Vec<(&str, bool)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::ApplyCut(name, passed) => Some((name.as_str(), *passed)),
                _ => None,
            })
            .collect()
    }

    /// Histogram fills, in order
    pub fn fills(&self) -> Vec<(&str, Float)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Fill(name, value) => Some((name.as_str(), *value)),
                _ => None,
            })
            .collect()
    }
}

impl CutRegistry for Recorder {
    fn add_region(&mut self, name: &str) -> Result<()> {
        self.calls.push(Call::AddRegion(name.to_owned()));
        Ok(())
    }

    fn add_cut(&mut self, name: &str) -> Result<()> {
        self.calls.push(Call::AddCut(name.to_owned()));
        Ok(())
    }

    fn begin_event(&mut self, weight: Float) {
        self.calls.push(Call::BeginEvent(weight));
    }

    fn apply_cut(&mut self, condition: bool, name: &str) -> bool {
        self.calls.push(Call::ApplyCut(name.to_owned(), condition));
        condition
    }
}

impl HistogramRegistry for Recorder {
    fn add_histogram(&mut self, name: &str, bins: usize, min: Float, max: Float) -> Result<()> {
        self.calls.push(Call::AddHistogram(name.to_owned(), bins, min, max));
        Ok(())
    }

    fn begin_event(&mut self, weight: Float) {
        self.calls.push(Call::BeginEvent(weight));
    }

    fn fill(&mut self, name: &str, value: Float) {
        self.calls.push(Call::Fill(name.to_owned(), value));
    }
}
