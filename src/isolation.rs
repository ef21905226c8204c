//! Isolation energy computations
//!
//! An object is "isolated" when little energy flows around it. The amount of
//! surrounding energy is measured by summing the transverse momenta of the
//! event's energy-flow constituents that lie within a cone around the object.

use crate::{
    event::RecEvent,
    momentum::{Kinematics, Momentum},
    numeric::Float,
};

/// Which energy-flow constituents take part in an isolation sum
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IsolationComponent {
    /// Charged particle tracks only
    Track,
    /// Neutral hadron deposits only
    Neutral,
    /// Photon deposits only
    Photon,
    /// Everything
    All,
}

/// Something that can compute isolation energies
pub trait IsolationCalculator {
    /// Sum the energy surrounding `object` within `cone`, ignoring anything
    /// closer than `veto`
    fn sum_isolation(
        &self,
        object: &Momentum,
        rec: &RecEvent,
        cone: Float,
        veto: Float,
        component: IsolationComponent,
    ) -> Float;
}

/// Isolation computed from the event's energy-flow constituents
///
/// A constituent contributes its transverse momentum when it lies at
/// `veto <= ΔR < cone` from the object. With a zero veto, the object's own
/// deposit (if any) is included in the sum.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct EflowIsolation;
//
impl EflowIsolation {
    /// Sum the contributions of one collection of constituents
    fn sum_collection(
        object: &Momentum,
        constituents: &[Momentum],
        cone: Float,
        veto: Float,
    ) -> Float {
        constituents
            .iter()
            .filter(|c| {
                let dr = object.delta_r(c);
                dr >= veto && dr < cone
            })
            .map(|c| c.pt())
            .sum()
    }
}

impl IsolationCalculator for EflowIsolation {
    fn sum_isolation(
        &self,
        object: &Momentum,
        rec: &RecEvent,
        cone: Float,
        veto: Float,
        component: IsolationComponent,
    ) -> Float {
        let eflow = &rec.eflow;
        let sum =
            |constituents: &[Momentum]| Self::sum_collection(object, constituents, cone, veto);
        match component {
            IsolationComponent::Track => sum(&eflow.tracks),
            IsolationComponent::Neutral => sum(&eflow.neutral_hadrons),
            IsolationComponent::Photon => sum(&eflow.photons),
            IsolationComponent::All => {
                sum(&eflow.tracks) + sum(&eflow.neutral_hadrons) + sum(&eflow.photons)
            }
        }
    }
}
