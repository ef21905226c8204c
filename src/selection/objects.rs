//! Identification of signal objects within an event

use super::{cuts::LeptonRequirements, EventSelector};
use crate::{
    event::{PhysicsObject, RecEvent},
    isolation::{IsolationCalculator, IsolationComponent},
};

use log::trace;

/// Insert an object into a list sorted by decreasing transverse momentum
///
/// The object goes right before the first element of smaller pt, so objects
/// of equal pt keep their insertion order.
///
pub fn insert_by_decreasing_pt<'ev>(
    list: &mut Vec<&'ev PhysicsObject>,
    object: &'ev PhysicsObject,
) {
    let pt = object.pt();
    let position = list
        .iter()
        .position(|other| other.pt() < pt)
        .unwrap_or(list.len());
    list.insert(position, object);
}

impl<I: IsolationCalculator> EventSelector<I> {
    /// Decide whether a reconstructed photon is a signal photon
    pub fn is_signal_photon(&self, rec: &RecEvent, photon: &PhysicsObject) -> bool {
        let cuts = &self.cuts;
        let abseta = photon.abseta();
        let pt = photon.pt();

        if cuts.outside_photon_acceptance(abseta) || pt < cuts.photon_min_pt {
            return false;
        }

        let isolation = |component| {
            self.isolation.sum_isolation(
                photon.momentum(),
                rec,
                cuts.photon_isolation_cone,
                cuts.isolation_veto,
                component,
            )
        };
        let i_charged = isolation(IsolationComponent::Track);
        let i_neutral = isolation(IsolationComponent::Neutral);
        let i_photon = isolation(IsolationComponent::Photon);

        // The photon's own deposit is part of the photon component
        let bounds = cuts.photon_isolation(abseta);
        let isolated = (i_photon - pt) < bounds.photon.at(pt)
            && i_neutral < bounds.neutral.at(pt)
            && i_charged < bounds.charged;
        trace!(
            "Photon pt={pt:.1} |eta|={abseta:.2}: Iγ={i_photon:.2}, In={i_neutral:.2}, \
             Iπ={i_charged:.2} -> isolated={isolated}"
        );
        isolated
    }

    /// Add a photon to the signal photon list if it qualifies, keeping the
    /// list sorted by decreasing pt
    pub fn classify_photon<'ev>(
        &self,
        rec: &RecEvent,
        signal_photons: &mut Vec<&'ev PhysicsObject>,
        photon: &'ev PhysicsObject,
    ) {
        if self.is_signal_photon(rec, photon) {
            insert_by_decreasing_pt(signal_photons, photon);
        }
    }

    /// Decide whether a reconstructed lepton is a signal lepton
    pub fn is_signal_lepton(
        &self,
        rec: &RecEvent,
        lepton: &PhysicsObject,
        requirements: &LeptonRequirements,
    ) -> bool {
        let pt = lepton.pt();
        if pt < requirements.min_pt || lepton.abseta() >= requirements.max_abseta {
            return false;
        }
        let all_energy = self.isolation.sum_isolation(
            lepton.momentum(),
            rec,
            requirements.isolation_cone,
            self.cuts.isolation_veto,
            IsolationComponent::All,
        );
        all_energy < self.cuts.lepton_max_rel_isolation * pt
    }

    /// Append a lepton to a signal lepton list if it qualifies
    pub fn classify_lepton<'ev>(
        &self,
        rec: &RecEvent,
        signal_leptons: &mut Vec<&'ev PhysicsObject>,
        lepton: &'ev PhysicsObject,
        requirements: &LeptonRequirements,
    ) {
        if self.is_signal_lepton(rec, lepton, requirements) {
            signal_leptons.push(lepton);
        }
    }

    /// Find the pairing partner of the tau at `index` in `taus`
    ///
    /// Among the other taus with enough pt and close enough to the given tau,
    /// the one with the highest pt is chosen (the latest one wins ties). No
    /// partner is looked for if the given tau is too forward.
    ///
    pub fn find_pair_tau(&self, taus: &[PhysicsObject], index: usize) -> Option<usize> {
        let cuts = &self.cuts;
        let tau = taus.get(index)?;
        if tau.abseta() >= cuts.pair_tau_max_abseta {
            return None;
        }

        let mut best: Option<usize> = None;
        for (candidate_idx, candidate) in taus.iter().enumerate() {
            if candidate_idx == index {
                continue;
            }
            let pt = candidate.pt();
            if pt < cuts.pair_tau_min_pt || best.map_or(false, |best| pt < taus[best].pt()) {
                continue;
            }
            if tau.dr(candidate) >= cuts.pair_tau_max_dr {
                continue;
            }
            best = Some(candidate_idx);
        }
        best
    }
}
