//! This module defines the properties and storage of reconstructed events

use crate::{
    momentum::{Kinematics, Momentum},
    numeric::Float,
};
use std::fmt::{self, Display};

/// Kind of reconstructed physics object
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ObjectKind {
    /// Photon
    Photon,
    /// Electron
    Electron,
    /// Muon
    Muon,
    /// Hadronically decaying tau
    Tau,
    /// Hadronic jet
    Jet,
}

/// Reconstructed physics object
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsObject {
    kind: ObjectKind,
    momentum: Momentum,
}
//
impl PhysicsObject {
    /// Wrap a 4-momentum into a physics object of a certain kind
    pub fn new(kind: ObjectKind, momentum: Momentum) -> Self {
        Self { kind, momentum }
    }

    /// Kind of object
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// 4-momentum of the object
    pub fn momentum(&self) -> &Momentum {
        &self.momentum
    }

    /// Transverse momentum
    pub fn pt(&self) -> Float {
        self.momentum.pt()
    }

    /// Magnitude of the pseudorapidity
    pub fn abseta(&self) -> Float {
        self.momentum.abseta()
    }

    /// Angular separation with respect to another object
    pub fn dr(&self, other: &PhysicsObject) -> Float {
        self.momentum.delta_r(&other.momentum)
    }

    /// Azimuthal separation with respect to a 4-momentum, folded into [0, π]
    pub fn dphi_0_pi(&self, other: &Momentum) -> Float {
        self.momentum.dphi_0_pi(other)
    }
}

/// Energy-flow constituents of an event, used for isolation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnergyFlow {
    /// Charged particle tracks
    pub tracks: Vec<Momentum>,

    /// Neutral hadron calorimeter deposits
    pub neutral_hadrons: Vec<Momentum>,

    /// Photon calorimeter deposits
    pub photons: Vec<Momentum>,
}

/// Reconstructed part of an event
#[derive(Clone, Debug, PartialEq)]
pub struct RecEvent {
    /// Reconstructed photons
    pub photons: Vec<PhysicsObject>,

    /// Reconstructed electrons
    pub electrons: Vec<PhysicsObject>,

    /// Reconstructed muons
    pub muons: Vec<PhysicsObject>,

    /// Reconstructed hadronic taus
    pub taus: Vec<PhysicsObject>,

    /// Reconstructed jets
    pub jets: Vec<PhysicsObject>,

    /// Missing transverse momentum
    pub met: Momentum,

    /// Energy-flow constituents
    pub eflow: EnergyFlow,
}

impl Default for RecEvent {
    fn default() -> Self {
        Self {
            photons: Vec::new(),
            electrons: Vec::new(),
            muons: Vec::new(),
            taus: Vec::new(),
            jets: Vec::new(),
            met: Momentum::zeros(),
            eflow: EnergyFlow::default(),
        }
    }
}

/// Generator-level part of an event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct McEvent {
    /// Weight of the event, applied to all histogram fills
    pub weight: Float,
}

/// Storage for a simulated collision event
///
/// Either part of the record may be missing, in which case the selection
/// skips the event altogether.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Event {
    /// Reconstructed record
    pub rec: Option<RecEvent>,

    /// Generator-level record
    pub mc: Option<McEvent>,
}
//
impl Event {
    /// Build a complete event
    pub fn new(rec: RecEvent, weight: Float) -> Self {
        Self {
            rec: Some(rec),
            mc: Some(McEvent { weight }),
        }
    }
}

impl Display for Event {
    /// Dump a one-line summary of the event contents
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.rec, &self.mc) {
            (Some(rec), Some(mc)) => write!(
                fmt,
                "{} photons, {} electrons, {} muons, {} taus, {} jets, MET {:.1} GeV, weight {}",
                rec.photons.len(),
                rec.electrons.len(),
                rec.muons.len(),
                rec.taus.len(),
                rec.jets.len(),
                rec.met.pt(),
                mc.weight
            ),
            _ => write!(fmt, "incomplete event record"),
        }
    }
}
