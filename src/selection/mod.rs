//! The test_cms event selection
//!
//! Events with two isolated photons and missing transverse momentum are
//! selected through an ordered chain of named cuts, and end up in one of two
//! MET histograms. Along the way, control histograms are filled for events
//! with a hadronic tau and either a lepton or another hadronic tau.

mod cuts;
mod objects;

pub use self::{
    cuts::{LeptonRequirements, LinearBound, PhotonIsolation, SelectionCuts},
    objects::insert_by_decreasing_pt,
};

use crate::{
    event::{Event, PhysicsObject, RecEvent},
    isolation::{EflowIsolation, IsolationCalculator},
    manager::{CutRegistry, HistogramRegistry},
    momentum::{Kinematics, Momentum},
    numeric::Float,
    Result,
};

use eyre::WrapErr;
use log::{debug, info, trace};

/// Name of the analysis
pub const ANALYSIS_NAME: &str = "test_cms";

/// Analysis regions, declared for bookkeeping purposes only
pub const REGIONS: [&str; 2] = ["diphoton", "diptau"];

/// MET histogram of the low MET signal region
pub const LOW_PT_MISS: &str = "low_pTmiss";
/// MET histogram of the high MET signal region
pub const HIGH_PT_MISS: &str = "high_pTmiss";
/// MET histogram of the electron + hadronic tau control channel
pub const ETH: &str = "eth";
/// MET histogram of the muon + hadronic tau control channel
pub const UTH: &str = "uth";
/// MET histogram of the hadronic tau pair control channel
pub const THTH: &str = "thth";

/// Every histogram of the analysis, in declaration order
pub const HISTOGRAMS: [&str; 5] = [LOW_PT_MISS, HIGH_PT_MISS, ETH, UTH, THTH];

/// Binning shared by all histograms: (bins, min, max) in GeV
pub const HISTOGRAM_BINNING: (usize, Float, Float) = (20, 0., 1000.);

/// At least two hard enough signal photons
pub const LEADING_PHOTONS_PT: &str = "leading_photons_pT";
/// Light enough diphoton system
pub const DIPHOTON_M: &str = "diphoton_M";
/// Diphoton system back-to-back with the MET
pub const AZIMUTHAL_SEP: &str = "azimuthal_sep";
/// Hard jets away from the MET (sic)
pub const JETS_AZIMUTAL_SEP: &str = "jets_azimutal_sep";
/// Few hard jets
pub const MULTIJET_BACKGROUNDS: &str = "multijet_backgrounds";
/// Event falls into one of the MET signal regions
pub const KINETIC_REQUIREMENTS: &str = "kinetic_requirements";

/// Every cut of the analysis, in the order where they are applied
pub const CUTS: [&str; 6] = [
    LEADING_PHOTONS_PT,
    DIPHOTON_M,
    AZIMUTHAL_SEP,
    JETS_AZIMUTAL_SEP,
    MULTIJET_BACKGROUNDS,
    KINETIC_REQUIREMENTS,
];

/// Outcome of the selection of one event
///
/// This is only informative: the cut and histogram registries are the
/// actual record of what happened.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Selection {
    /// The event record was incomplete, nothing was recorded
    Skipped,

    /// The event failed the named cut
    Rejected(&'static str),

    /// The event was accepted into the named histogram
    Accepted(&'static str),
}

/// Properties of the system formed by the two leading signal photons
#[derive(Clone, Debug, PartialEq)]
pub struct Diphoton {
    /// Combined 4-momentum
    pub momentum: Momentum,

    /// Invariant mass
    pub mass: Float,

    /// Transverse momentum
    pub pt: Float,

    /// Transverse momentum of the leading photon
    pub leading_pt: Float,

    /// Transverse momentum of the sub-leading photon
    pub subleading_pt: Float,
}

/// Event selection of the test_cms analysis
pub struct EventSelector<I = EflowIsolation> {
    cuts: SelectionCuts,
    isolation: I,
}
//
impl EventSelector {
    /// Set up the selection, using energy-flow isolation
    pub fn new(cuts: SelectionCuts) -> Self {
        Self::with_isolation(cuts, EflowIsolation)
    }
}
//
impl<I: IsolationCalculator> EventSelector<I> {
    // ### CONSTRUCTION ###

    /// Set up the selection with a custom isolation calculator
    pub fn with_isolation(cuts: SelectionCuts, isolation: I) -> Self {
        Self { cuts, isolation }
    }

    /// Access the selection thresholds
    pub fn cuts(&self) -> &SelectionCuts {
        &self.cuts
    }

    // ### ANALYSIS LIFECYCLE ###

    /// Declare the regions, histograms and cuts of the analysis
    pub fn initialize(
        &self,
        cuts: &mut impl CutRegistry,
        histos: &mut impl HistogramRegistry,
    ) -> Result<()> {
        info!("Initializing the {} analysis", ANALYSIS_NAME);
        for region in REGIONS {
            cuts.add_region(region)
                .wrap_err_with(|| format!("Failed to declare region {}", region))?;
        }
        let (bins, min, max) = HISTOGRAM_BINNING;
        for histo in HISTOGRAMS {
            histos
                .add_histogram(histo, bins, min, max)
                .wrap_err_with(|| format!("Failed to declare histogram {}", histo))?;
        }
        for cut in CUTS {
            cuts.add_cut(cut)
                .wrap_err_with(|| format!("Failed to declare cut {}", cut))?;
        }
        if self.cuts.separate_muon_list {
            info!("Signal muons are kept apart from signal electrons");
        }
        Ok(())
    }

    /// Process one event
    ///
    /// Always returns true: rejected events are only visible in the cut
    /// registry, and processing carries on with the next event.
    ///
    pub fn execute(
        &self,
        event: &Event,
        cuts: &mut impl CutRegistry,
        histos: &mut impl HistogramRegistry,
    ) -> bool {
        let selection = self.select(event, cuts, histos);
        trace!("Selection outcome: {:?}", selection);
        true
    }

    /// Wrap up the analysis
    pub fn finalize(&self) {
        info!("Finalized the {} analysis", ANALYSIS_NAME);
    }

    // ### SELECTION ###

    /// Run the selection on one event, telling what happened to it
    pub fn select(
        &self,
        event: &Event,
        cuts: &mut impl CutRegistry,
        histos: &mut impl HistogramRegistry,
    ) -> Selection {
        let (rec, weight) = match (&event.rec, &event.mc) {
            (Some(rec), Some(mc)) => (rec, mc.weight),
            _ => {
                debug!("Skipping an event with an incomplete record");
                return Selection::Skipped;
            }
        };
        cuts.begin_event(weight);
        histos.begin_event(weight);
        debug!("Processing event: {}", event);

        let met = &rec.met;
        let met_pt = met.pt();

        // Signal photons, by decreasing pt
        let mut signal_photons = Vec::new();
        for photon in &rec.photons {
            self.classify_photon(rec, &mut signal_photons, photon);
        }

        // Signal leptons. Muons historically end up in the electron list.
        let mut signal_electrons = Vec::new();
        let mut signal_muons = Vec::new();
        for electron in &rec.electrons {
            self.classify_lepton(rec, &mut signal_electrons, electron, &self.cuts.electron);
        }
        for muon in &rec.muons {
            let list = if self.cuts.separate_muon_list {
                &mut signal_muons
            } else {
                &mut signal_electrons
            };
            self.classify_lepton(rec, list, muon, &self.cuts.muon);
        }
        trace!(
            "{} signal photons, {} signal electrons, {} signal muons",
            signal_photons.len(),
            signal_electrons.len(),
            signal_muons.len()
        );

        if met_pt > self.cuts.tau_channels_min_met {
            self.fill_tau_channels(rec, &signal_electrons, &signal_muons, met_pt, histos);
        }

        let diphoton = match self.veto_signal_photons(met, &signal_photons, cuts) {
            Ok(diphoton) => diphoton,
            Err(cut) => return Selection::Rejected(cut),
        };

        if let Err(cut) = self.veto_jets(rec, cuts) {
            return Selection::Rejected(cut);
        }

        self.classify_kinematics(met_pt, &diphoton, cuts, histos)
    }

    /// Fill the hadronic tau control histograms with the MET
    fn fill_tau_channels(
        &self,
        rec: &RecEvent,
        signal_electrons: &[&PhysicsObject],
        signal_muons: &[&PhysicsObject],
        met_pt: Float,
        histos: &mut impl HistogramRegistry,
    ) {
        let cuts = &self.cuts;

        // Lepton + hadronic tau
        for (leptons, histo) in [(signal_electrons, ETH), (signal_muons, UTH)] {
            for lepton in leptons {
                for tau in &rec.taus {
                    if lepton.dr(tau) > cuts.lepton_tau_max_dr
                        || tau.pt() <= cuts.tau_min_pt
                        || tau.abseta() >= cuts.tau_max_abseta
                    {
                        continue;
                    }
                    histos.fill(histo, met_pt);
                }
            }
        }

        // Hadronic tau pairs (each pair may be seen from both of its taus)
        for (index, tau) in rec.taus.iter().enumerate() {
            let Some(partner_idx) = self.find_pair_tau(&rec.taus, index) else {
                continue;
            };
            let partner = &rec.taus[partner_idx];
            if tau.pt() + partner.pt() < cuts.ditau_min_pt_sum {
                continue;
            }
            if (tau.momentum() + partner.momentum()).mass() >= cuts.ditau_max_mass {
                continue;
            }
            histos.fill(THTH, met_pt);
        }
    }

    /// Apply the diphoton cuts, returning the diphoton system on success and
    /// the name of the failing cut otherwise
    pub fn veto_signal_photons(
        &self,
        met: &Momentum,
        signal_photons: &[&PhysicsObject],
        cuts: &mut impl CutRegistry,
    ) -> std::result::Result<Diphoton, &'static str> {
        let thresholds = &self.cuts;

        let enough_photons = signal_photons.len() >= 2
            && signal_photons[0].pt() >= thresholds.leading_photon_min_pt
            && signal_photons[1].pt() >= thresholds.subleading_photon_min_pt;
        if !cuts.apply_cut(enough_photons, LEADING_PHOTONS_PT) {
            return Err(LEADING_PHOTONS_PT);
        }

        let (leading, subleading) = (signal_photons[0], signal_photons[1]);
        let momentum = leading.momentum() + subleading.momentum();
        let mass = momentum.mass();
        if !cuts.apply_cut(mass < thresholds.diphoton_max_mass, DIPHOTON_M) {
            return Err(DIPHOTON_M);
        }

        let dphi = momentum.delta_phi(met).abs();
        if !cuts.apply_cut(dphi > thresholds.diphoton_met_min_dphi, AZIMUTHAL_SEP) {
            return Err(AZIMUTHAL_SEP);
        }

        Ok(Diphoton {
            pt: momentum.pt(),
            momentum,
            mass,
            leading_pt: leading.pt(),
            subleading_pt: subleading.pt(),
        })
    }

    /// Apply the jet cuts, returning the name of the failing cut if any
    fn veto_jets(
        &self,
        rec: &RecEvent,
        cuts: &mut impl CutRegistry,
    ) -> std::result::Result<(), &'static str> {
        let thresholds = &self.cuts;
        let met = &rec.met;

        let mut jet_count = 0;
        for jet in rec.jets.iter().filter(|jet| jet.pt() > thresholds.jet_min_pt) {
            if !cuts.apply_cut(
                jet.dphi_0_pi(met) > thresholds.jet_met_min_dphi,
                JETS_AZIMUTAL_SEP,
            ) {
                return Err(JETS_AZIMUTAL_SEP);
            }
            if jet.pt() >= thresholds.jet_count_min_pt {
                jet_count += 1;
            }
        }

        if !cuts.apply_cut(jet_count < thresholds.max_jets, MULTIJET_BACKGROUNDS) {
            return Err(MULTIJET_BACKGROUNDS);
        }
        Ok(())
    }

    /// Sort a selected event into one of the MET signal regions
    fn classify_kinematics(
        &self,
        met_pt: Float,
        diphoton: &Diphoton,
        cuts: &mut impl CutRegistry,
        histos: &mut impl HistogramRegistry,
    ) -> Selection {
        let thresholds = &self.cuts;
        let leading_ratio = diphoton.leading_pt / diphoton.mass;
        let subleading_ratio = diphoton.subleading_pt / diphoton.mass;

        if met_pt > thresholds.low_met_min
            && met_pt < thresholds.met_boundary
            && leading_ratio > thresholds.low_leading_ratio
            && subleading_ratio > thresholds.subleading_ratio
            && diphoton.pt > thresholds.low_diphoton_min_pt
        {
            histos.fill(LOW_PT_MISS, met_pt);
            Selection::Accepted(LOW_PT_MISS)
        } else if met_pt > thresholds.met_boundary
            && leading_ratio > thresholds.high_leading_ratio
            && subleading_ratio > thresholds.subleading_ratio
            && diphoton.pt > thresholds.high_diphoton_min_pt
        {
            histos.fill(HIGH_PT_MISS, met_pt);
            Selection::Accepted(HIGH_PT_MISS)
        } else {
            cuts.apply_cut(false, KINETIC_REQUIREMENTS);
            Selection::Rejected(KINETIC_REQUIREMENTS)
        }
    }
}

#[cfg(test)]
mod tests;
