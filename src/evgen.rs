//! This module provides toy event generation facilities

use crate::{
    event::{EnergyFlow, Event, McEvent, ObjectKind, PhysicsObject, RecEvent},
    momentum::{from_pt_eta_phi_m, Kinematics},
    numeric::{reals::consts::PI, Float},
    random::RandomGenerator,
};

use log::debug;

/// Generated objects are spread uniformly in [-MAX_ETA, MAX_ETA]
const MAX_ETA: Float = 3.;

/// Energy-flow constituents are scattered up to this far in eta and phi
const EFLOW_SPREAD: Float = 0.4;

/// Mean transverse momentum of soft energy-flow constituents (GeV)
const SOFT_PT_SCALE: Float = 0.5;

/// Parameters of the toy event generator
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorSettings {
    /// Mean number of photons per event
    pub mean_photons: Float,

    /// Mean number of electrons per event
    pub mean_electrons: Float,

    /// Mean number of muons per event
    pub mean_muons: Float,

    /// Mean number of hadronic taus per event
    pub mean_taus: Float,

    /// Mean number of jets per event
    pub mean_jets: Float,

    /// Mean transverse momentum of generated objects (GeV)
    pub pt_scale: Float,

    /// Mean missing transverse momentum (GeV)
    pub met_scale: Float,

    /// Number of soft energy-flow constituents around each object
    pub eflow_per_object: usize,

    /// Weight of every generated event
    pub weight: Float,

    /// Fraction of events generated without a reconstructed record
    pub missing_record_fraction: Float,
}
//
impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            mean_photons: 2.,
            mean_electrons: 0.3,
            mean_muons: 0.3,
            mean_taus: 0.5,
            mean_jets: 1.5,
            pt_scale: 40.,
            met_scale: 60.,
            eflow_per_object: 3,
            weight: 1.,
            missing_record_fraction: 0.,
        }
    }
}

/// Generator of toy reconstructed events
pub struct EventGenerator {
    settings: GeneratorSettings,
}
//
impl EventGenerator {
    /// Set up event generation
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    /// Generate a new event
    pub fn generate(&self, rng: &mut RandomGenerator) -> Event {
        let settings = &self.settings;
        if rng.bernoulli(settings.missing_record_fraction) {
            debug!("Generated an event without reconstructed record");
            return Event {
                rec: None,
                mc: Some(McEvent {
                    weight: settings.weight,
                }),
            };
        }

        let mut objects = |kind: ObjectKind, mean: Float| -> Vec<PhysicsObject> {
            (0..rng.poisson(mean))
                .map(|_| Self::generate_object(rng, kind, settings.pt_scale))
                .collect()
        };
        let mut rec = RecEvent {
            photons: objects(ObjectKind::Photon, settings.mean_photons),
            electrons: objects(ObjectKind::Electron, settings.mean_electrons),
            muons: objects(ObjectKind::Muon, settings.mean_muons),
            taus: objects(ObjectKind::Tau, settings.mean_taus),
            jets: objects(ObjectKind::Jet, settings.mean_jets),
            met: from_pt_eta_phi_m(
                rng.exponential(settings.met_scale),
                0.,
                rng.uniform(-PI, PI),
                0.,
            ),
            eflow: EnergyFlow::default(),
        };
        rec.eflow = self.generate_eflow(rng, &rec);

        let event = Event::new(rec, settings.weight);
        debug!("Generated {}", event);
        event
    }

    /// Generate an object of a certain kind
    fn generate_object(
        rng: &mut RandomGenerator,
        kind: ObjectKind,
        pt_scale: Float,
    ) -> PhysicsObject {
        let mass = match kind {
            ObjectKind::Photon => 0.,
            ObjectKind::Electron => 0.000511,
            ObjectKind::Muon => 0.106,
            ObjectKind::Tau => 1.777,
            ObjectKind::Jet => 10.,
        };
        let momentum = from_pt_eta_phi_m(
            rng.exponential(pt_scale),
            rng.uniform(-MAX_ETA, MAX_ETA),
            rng.uniform(-PI, PI),
            mass,
        );
        PhysicsObject::new(kind, momentum)
    }

    /// Generate the energy-flow constituents of an event
    ///
    /// Every object leaves its own deposit in the energy-flow category that
    /// matches its kind, surrounded by a few soft constituents of any
    /// category.
    ///
    fn generate_eflow(&self, rng: &mut RandomGenerator, rec: &RecEvent) -> EnergyFlow {
        let mut eflow = EnergyFlow::default();
        let all_objects = rec
            .photons
            .iter()
            .chain(&rec.electrons)
            .chain(&rec.muons)
            .chain(&rec.taus)
            .chain(&rec.jets);
        for object in all_objects {
            let momentum = *object.momentum();
            match object.kind() {
                ObjectKind::Photon => eflow.photons.push(momentum),
                ObjectKind::Electron | ObjectKind::Muon | ObjectKind::Tau => {
                    eflow.tracks.push(momentum)
                }
                ObjectKind::Jet => eflow.neutral_hadrons.push(momentum),
            }

            let (eta, phi) = (momentum.eta(), momentum.phi());
            for _ in 0..self.settings.eflow_per_object {
                let constituent = from_pt_eta_phi_m(
                    rng.exponential(SOFT_PT_SCALE),
                    eta + rng.uniform(-EFLOW_SPREAD, EFLOW_SPREAD),
                    phi + rng.uniform(-EFLOW_SPREAD, EFLOW_SPREAD),
                    0.,
                );
                match (3. * rng.random()) as usize {
                    0 => eflow.tracks.push(constituent),
                    1 => eflow.neutral_hadrons.push(constituent),
                    _ => eflow.photons.push(constituent),
                }
            }
        }
        eflow
    }
}
