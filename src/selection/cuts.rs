//! Thresholds of the event selection

use crate::numeric::Float;

/// Isolation bound that grows linearly with the object's transverse momentum
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearBound {
    /// Bound at zero transverse momentum (GeV)
    pub offset: Float,

    /// Growth of the bound per GeV of transverse momentum
    pub slope: Float,
}
//
impl LinearBound {
    /// Evaluate the bound for a given transverse momentum
    pub fn at(&self, pt: Float) -> Float {
        self.offset + self.slope * pt
    }
}

/// Isolation requirements of signal photons in one detector region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotonIsolation {
    /// Bound on photon-component isolation, minus the photon's own pt
    pub photon: LinearBound,

    /// Bound on neutral-hadron isolation
    pub neutral: LinearBound,

    /// Bound on charged-track isolation (GeV)
    pub charged: Float,
}

/// Requirements on a signal lepton
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeptonRequirements {
    /// Minimal transverse momentum (GeV)
    pub min_pt: Float,

    /// Pseudorapidity magnitude must be strictly below this
    pub max_abseta: Float,

    /// Radius of the isolation cone
    pub isolation_cone: Float,
}

/// Cuts on reconstructed events
///
/// Defaults are the thresholds of the test_cms analysis, every scalar can be
/// overridden from the configuration file.
///
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionCuts {
    // ### PHOTONS ###
    /// Minimal signal photon transverse momentum (GeV)
    pub photon_min_pt: Float,

    /// Maximal signal photon pseudorapidity magnitude
    pub photon_max_abseta: Float,

    /// Upper edge of the barrel (excluded from the barrel-endcap gap)
    pub barrel_max_abseta: Float,

    /// Upper edge of the barrel-endcap gap (included in the gap)
    pub endcap_min_abseta: Float,

    /// Radius of the photon isolation cones
    pub photon_isolation_cone: Float,

    /// Inner veto radius of all isolation cones
    pub isolation_veto: Float,

    /// Photon isolation in the barrel
    pub barrel_isolation: PhotonIsolation,

    /// Photon isolation in the endcaps
    pub endcap_isolation: PhotonIsolation,

    // ### LEPTONS ###
    /// Signal electron requirements
    pub electron: LeptonRequirements,

    /// Signal muon requirements
    pub muon: LeptonRequirements,

    /// Lepton isolation energy must be below this fraction of its pt
    pub lepton_max_rel_isolation: Float,

    /// Keep signal muons in their own list instead of the electron list
    pub separate_muon_list: bool,

    // ### TAU CONTROL CHANNELS ###
    /// Minimal MET for filling the tau control histograms (GeV)
    pub tau_channels_min_met: Float,

    /// Maximal (lepton, tau) angular separation
    pub lepton_tau_max_dr: Float,

    /// Minimal tau transverse momentum in (lepton, tau) pairs (GeV)
    pub tau_min_pt: Float,

    /// Maximal tau pseudorapidity magnitude in (lepton, tau) pairs
    pub tau_max_abseta: Float,

    /// Minimal transverse momentum of a tau pairing partner (GeV)
    pub pair_tau_min_pt: Float,

    /// Maximal angular separation of a tau pair
    pub pair_tau_max_dr: Float,

    /// Maximal pseudorapidity magnitude of a tau looking for a partner
    pub pair_tau_max_abseta: Float,

    /// Minimal scalar sum of the pt of a tau pair (GeV)
    pub ditau_min_pt_sum: Float,

    /// Maximal invariant mass of a tau pair (GeV)
    pub ditau_max_mass: Float,

    // ### DIPHOTON ###
    /// Minimal leading photon transverse momentum (GeV)
    pub leading_photon_min_pt: Float,

    /// Minimal sub-leading photon transverse momentum (GeV)
    pub subleading_photon_min_pt: Float,

    /// Diphoton invariant mass must be below this (GeV)
    pub diphoton_max_mass: Float,

    /// Minimal azimuthal separation between the diphoton and the MET
    pub diphoton_met_min_dphi: Float,

    // ### JETS ###
    /// Jets above this transverse momentum are checked against the MET (GeV)
    pub jet_min_pt: Float,

    /// Minimal azimuthal separation between such jets and the MET
    pub jet_met_min_dphi: Float,

    /// Jets above this transverse momentum count towards multiplicity (GeV)
    pub jet_count_min_pt: Float,

    /// Jet multiplicity must be strictly below this
    pub max_jets: usize,

    // ### KINEMATIC REQUIREMENTS ###
    /// Lower MET bound of the low MET region (GeV)
    pub low_met_min: Float,

    /// Boundary between the low and high MET regions (GeV)
    pub met_boundary: Float,

    /// Minimal leading photon pt / diphoton mass in the low MET region
    pub low_leading_ratio: Float,

    /// Minimal leading photon pt / diphoton mass in the high MET region
    pub high_leading_ratio: Float,

    /// Minimal sub-leading photon pt / diphoton mass in both regions
    pub subleading_ratio: Float,

    /// Minimal diphoton transverse momentum in the low MET region (GeV)
    pub low_diphoton_min_pt: Float,

    /// Minimal diphoton transverse momentum in the high MET region (GeV)
    pub high_diphoton_min_pt: Float,
}
//
impl SelectionCuts {
    /// Truth that a photon pseudorapidity lies in the barrel-endcap gap or
    /// beyond the tracker acceptance
    pub fn outside_photon_acceptance(&self, abseta: Float) -> bool {
        (abseta > self.barrel_max_abseta && abseta <= self.endcap_min_abseta)
            || abseta > self.photon_max_abseta
    }

    /// Isolation requirements applying at a given pseudorapidity
    pub fn photon_isolation(&self, abseta: Float) -> &PhotonIsolation {
        if abseta < self.barrel_max_abseta {
            &self.barrel_isolation
        } else {
            &self.endcap_isolation
        }
    }
}

impl Default for SelectionCuts {
    fn default() -> Self {
        Self {
            photon_min_pt: 20.,
            photon_max_abseta: 2.5,
            barrel_max_abseta: 1.44,
            endcap_min_abseta: 1.57,
            photon_isolation_cone: 0.3,
            isolation_veto: 0.,
            barrel_isolation: PhotonIsolation {
                photon: LinearBound {
                    offset: 0.7,
                    slope: 0.005,
                },
                neutral: LinearBound {
                    offset: 1.0,
                    slope: 0.04,
                },
                charged: 1.5,
            },
            endcap_isolation: PhotonIsolation {
                photon: LinearBound {
                    offset: 1.0,
                    slope: 0.005,
                },
                neutral: LinearBound {
                    offset: 1.5,
                    slope: 0.04,
                },
                charged: 1.2,
            },

            electron: LeptonRequirements {
                min_pt: 26.,
                max_abseta: 2.1,
                isolation_cone: 0.3,
            },
            muon: LeptonRequirements {
                min_pt: 26.,
                max_abseta: 2.4,
                isolation_cone: 0.3,
            },
            lepton_max_rel_isolation: 0.2,
            separate_muon_list: false,

            tau_channels_min_met: 105.,
            lepton_tau_max_dr: 0.5,
            tau_min_pt: 20.,
            tau_max_abseta: 2.3,
            pair_tau_min_pt: 40.,
            pair_tau_max_dr: 0.5,
            pair_tau_max_abseta: 2.1,
            ditau_min_pt_sum: 65.,
            ditau_max_mass: 125.,

            leading_photon_min_pt: 30.,
            subleading_photon_min_pt: 20.,
            diphoton_max_mass: 95.,
            diphoton_met_min_dphi: 2.1,

            jet_min_pt: 50.,
            jet_met_min_dphi: 0.5,
            jet_count_min_pt: 30.,
            max_jets: 3,

            low_met_min: 50.,
            met_boundary: 130.,
            low_leading_ratio: 0.45,
            high_leading_ratio: 0.5,
            subleading_ratio: 0.25,
            low_diphoton_min_pt: 75.,
            high_diphoton_min_pt: 90.,
        }
    }
}
