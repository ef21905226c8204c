//! This module implements some domain-specific 4-momentum handling logic.

use crate::numeric::{reals::consts::PI, Float};
use nalgebra::SVector;
use prefix_num_ops::real::*;

/// 4-momentum dimension
pub const MOMENTUM_DIM: usize = 4;

/// Relativistic 4-momentum
pub type Momentum = SVector<Float, MOMENTUM_DIM>;

/// Convenience const for accessing the X coordinate of a 4-vector
pub const X: usize = 0;

/// Convenience const for accessing the Y coordinate of a 4-vector
pub const Y: usize = 1;

/// Convenience const for accessing the Z coordinate of a 4-vector
pub const Z: usize = 2;

/// Convenience const for accessing the E coordinate of a 4-vector
pub const E: usize = 3;

/// Build a 4-momentum from collider coordinates
///
/// `phi` is the azimuthal angle around the beam axis, `eta` the
/// pseudorapidity, and `mass` the (non-negative) invariant mass.
///
pub fn from_pt_eta_phi_m(pt: Float, eta: Float, phi: Float, mass: Float) -> Momentum {
    let pz = pt * eta.sinh();
    let e = sqrt(pt * pt + pz * pz + mass * mass);
    Momentum::new(pt * cos(phi), pt * sin(phi), pz, e)
}

/// Collider kinematics of a 4-momentum
///
/// All angles are in radians, all momenta and energies in GeV.
///
pub trait Kinematics {
    /// Transverse momentum, relative to the beam (Z) axis
    fn pt(&self) -> Float;

    /// Pseudorapidity
    fn eta(&self) -> Float;

    /// Azimuthal angle in ]-π, π]
    fn phi(&self) -> Float;

    /// Invariant mass (negative for space-like vectors, like ROOT does it)
    fn mass(&self) -> Float;

    /// Magnitude of the pseudorapidity
    fn abseta(&self) -> Float {
        abs(self.eta())
    }

    /// Signed azimuthal difference, wrapped into [-π, π]
    fn delta_phi(&self, other: &Momentum) -> Float {
        let mut dphi = self.phi() - other.phi();
        if dphi > PI {
            dphi -= 2. * PI;
        } else if dphi <= -PI {
            dphi += 2. * PI;
        }
        dphi
    }

    /// Azimuthal difference folded into [0, π]
    fn dphi_0_pi(&self, other: &Momentum) -> Float {
        abs(self.delta_phi(other))
    }

    /// Angular separation ΔR = √(Δη² + Δφ²)
    fn delta_r(&self, other: &Momentum) -> Float;
}

impl Kinematics for Momentum {
    fn pt(&self) -> Float {
        sqrt(self[X] * self[X] + self[Y] * self[Y])
    }

    fn eta(&self) -> Float {
        let pt = self.pt();
        if pt > 0. {
            (self[Z] / pt).asinh()
        } else if self[Z] == 0. {
            0.
        } else {
            // Purely longitudinal vector
            self[Z].signum() * Float::INFINITY
        }
    }

    fn phi(&self) -> Float {
        if self[X] == 0. && self[Y] == 0. {
            0.
        } else {
            self[Y].atan2(self[X])
        }
    }

    fn mass(&self) -> Float {
        let m2 = self[E] * self[E] - self.fixed_rows::<3>(X).norm_squared();
        if m2 < 0. {
            -sqrt(-m2)
        } else {
            sqrt(m2)
        }
    }

    fn delta_r(&self, other: &Momentum) -> Float {
        let deta = self.eta() - other.eta();
        let dphi = self.delta_phi(other);
        sqrt(deta * deta + dphi * dphi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: Float = 1e-4;

    fn assert_close(actual: Float, expected: Float) {
        assert!(
            abs(actual - expected) < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn collider_coordinates_round_trip() {
        let p = from_pt_eta_phi_m(42., -1.3, 2.2, 5.);
        assert_close(p.pt(), 42.);
        assert_close(p.eta(), -1.3);
        assert_close(p.abseta(), 1.3);
        assert_close(p.phi(), 2.2);
        assert_close(p.mass(), 5.);
    }

    #[test]
    fn delta_phi_wraps_around() {
        let a = from_pt_eta_phi_m(10., 0., 3., 0.);
        let b = from_pt_eta_phi_m(10., 0., -3., 0.);
        // Going the short way around the circle
        assert_close(a.delta_phi(&b), 6. - 2. * PI);
        assert_close(b.delta_phi(&a), 2. * PI - 6.);
        assert_close(a.dphi_0_pi(&b), 2. * PI - 6.);
        assert!(a.dphi_0_pi(&b) >= 0. && a.dphi_0_pi(&b) <= PI);
    }

    #[test]
    fn delta_r_combines_eta_and_phi() {
        let a = from_pt_eta_phi_m(10., 0.3, 0.1, 0.);
        let b = from_pt_eta_phi_m(25., -0.1, 0.4, 0.);
        assert_close(a.delta_r(&b), sqrt(0.4 * 0.4 + 0.3 * 0.3));
        assert_close(a.delta_r(&a), 0.);
    }

    #[test]
    fn massless_pair_mass() {
        // Back-to-back massless particles: M = 2E
        let a = from_pt_eta_phi_m(30., 0., 0., 0.);
        let b = from_pt_eta_phi_m(30., 0., PI, 0.);
        assert_close((a + b).mass(), 60.);
        assert_close((a + b).pt(), 0.);
    }

    #[test]
    fn degenerate_vectors() {
        let beam = Momentum::new(0., 0., 10., 10.);
        assert_eq!(beam.eta(), Float::INFINITY);
        assert_eq!(Momentum::zeros().eta(), 0.);
        assert_eq!(Momentum::zeros().phi(), 0.);
        assert!(Momentum::new(0., 0., 5., 3.).mass() < 0.);
    }
}
