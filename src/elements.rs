//! Keplerian orbital elements and closed-form position propagation.

use crate::math::{normalize_angle, rotate_x, rotate_z};
use crate::time::SECONDS_PER_DAY;
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::PI;
use thiserror::Error;

/// Newton-iteration stop criterion for Kepler's equation.
pub const KEPLER_TOLERANCE: f64 = 1e-12;
/// Iteration cap; the solver returns its best estimate when reached.
pub const KEPLER_MAX_ITER: usize = 50;

#[derive(Debug, Error)]
pub enum ElementError {
    #[error("eccentricity {0} outside [0, 1), orbit is not an ellipse")]
    Eccentricity(f64),
    #[error("semi-major axis {0} must be positive")]
    SemiMajorAxis(f64),
    #[error("gravitational parameter {0} must be positive")]
    GravitationalParameter(f64),
}

/// Classical Keplerian elements of an elliptical orbit around a central body.
///
/// Angles are stored in radians, distances in meters. `mu` is the
/// gravitational parameter of the *central* body, which fixes the mean
/// motion together with the semi-major axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node: f64,
    pub arg_periapsis: f64,
    /// Mean anomaly at the J2000 epoch.
    pub mean_anomaly_0: f64,
    pub mu: f64,
}

impl OrbitalElements {
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        ascending_node: f64,
        arg_periapsis: f64,
        mean_anomaly_0: f64,
        mu: f64,
    ) -> Result<Self, ElementError> {
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(ElementError::Eccentricity(eccentricity));
        }
        if semi_major_axis <= 0.0 {
            return Err(ElementError::SemiMajorAxis(semi_major_axis));
        }
        if mu <= 0.0 {
            return Err(ElementError::GravitationalParameter(mu));
        }
        Ok(Self {
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_node,
            arg_periapsis,
            mean_anomaly_0,
            mu,
        })
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    /// Mean motion in radians per second.
    pub fn mean_motion(&self) -> f64 {
        (self.mu / self.semi_major_axis.powi(3)).sqrt()
    }

    pub fn period_days(&self) -> f64 {
        2.0 * PI / self.mean_motion() / SECONDS_PER_DAY
    }

    /// Mean anomaly at `t_days` since the J2000 epoch.
    pub fn mean_anomaly_at(&self, t_days: f64) -> f64 {
        normalize_angle(self.mean_anomaly_0 + self.mean_motion() * t_days * SECONDS_PER_DAY)
    }

    /// Rotation from the perifocal frame (x toward periapsis) into the
    /// reference frame: Rz(node) * Rx(inclination) * Rz(periapsis).
    pub fn orientation(&self) -> Matrix3<f64> {
        rotate_z(self.ascending_node) * rotate_x(self.inclination) * rotate_z(self.arg_periapsis)
    }

    /// Position relative to the central body at `t_days` since J2000.
    pub fn position_at(&self, t_days: f64) -> Vector3<f64> {
        let ea = solve_kepler(self.mean_anomaly_at(t_days), self.eccentricity);
        self.point_at_eccentric(ea)
    }

    /// Closed polyline tracing the full ellipse, sampled uniformly in
    /// eccentric anomaly. Independent of time; first and last points match.
    pub fn orbit_path(&self, samples: usize) -> Vec<Vector3<f64>> {
        (0..=samples)
            .map(|k| self.point_at_eccentric(2.0 * PI * k as f64 / samples as f64))
            .collect()
    }

    fn point_at_eccentric(&self, ea: f64) -> Vector3<f64> {
        let x = self.semi_major_axis * (ea.cos() - self.eccentricity);
        let y = self.semi_minor_axis() * ea.sin();
        self.orientation() * Vector3::new(x, y, 0.0)
    }
}

/// Solve Kepler's equation `E - e sin E = M` for the eccentric anomaly.
///
/// Newton iteration seeded with M (or pi for high eccentricity). Always
/// terminates; when the cap is hit the current estimate is returned.
pub fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let m = normalize_angle(mean_anomaly);
    let mut ea = if e < 0.8 { m } else { PI };
    for _ in 0..KEPLER_MAX_ITER {
        let f = ea - e * ea.sin() - m;
        let fp = 1.0 - e * ea.cos();
        let delta = f / fp;
        ea -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    ea
}

/// Mean anomaly corresponding to a true anomaly on an ellipse.
///
/// The catalog's reference data specifies where each planet was at the epoch
/// as a true anomaly; propagation wants the mean anomaly.
pub fn mean_from_true(true_anomaly: f64, e: f64) -> f64 {
    let (sv, cv) = true_anomaly.sin_cos();
    let denom = 1.0 + e * cv;
    let ea = ((1.0 - e * e).sqrt() * sv / denom).atan2((e + cv) / denom);
    normalize_angle(ea - e * ea.sin())
}

/// True anomaly for a mean anomaly, via the eccentric anomaly.
pub fn true_from_mean(mean_anomaly: f64, e: f64) -> f64 {
    let ea = solve_kepler(mean_anomaly, e);
    let half = ((1.0 + e) / (1.0 - e)).sqrt() * (ea / 2.0).tan();
    normalize_angle(2.0 * half.atan())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circular(a: f64) -> OrbitalElements {
        OrbitalElements::new(a, 0.0, 0.0, 0.0, 0.0, 0.0, 3.986e14).unwrap()
    }

    #[test]
    fn kepler_residual_within_tolerance_across_grid() {
        for &e in &[0.0, 0.05, 0.2, 0.5, 0.8, 0.9, 0.95] {
            for k in 0..64 {
                let m = 2.0 * PI * k as f64 / 64.0;
                let ea = solve_kepler(m, e);
                let residual = (ea - e * ea.sin() - m).abs();
                assert!(residual < 1e-9, "e={e} m={m} residual={residual}");
            }
        }
    }

    #[test]
    fn kepler_terminates_for_extreme_eccentricity() {
        for &m in &[0.001, 0.01, PI, 6.0] {
            let ea = solve_kepler(m, 0.999);
            assert!(ea.is_finite(), "m={m} gave {ea}");
        }
    }

    #[test]
    fn circular_orbit_path_has_constant_radius() {
        let el = circular(1.0e11);
        for p in el.orbit_path(100) {
            assert!(
                (p.norm() - 1.0e11).abs() < 1.0,
                "radius off circle: {}",
                p.norm()
            );
        }
    }

    #[test]
    fn orbit_closes_after_one_period() {
        let el =
            OrbitalElements::new(1.496e11, 0.0167, 0.1, 0.4, 1.8, 0.7, 1.327e20).unwrap();
        let start = el.position_at(0.0);
        let end = el.position_at(el.period_days());
        assert!(
            (end - start).norm() < el.semi_major_axis * 1e-6,
            "gap = {}",
            (end - start).norm()
        );
    }

    #[test]
    fn radius_stays_between_periapsis_and_apoapsis() {
        let el =
            OrbitalElements::new(2.0e11, 0.3, 0.2, 1.0, 2.0, 0.0, 1.327e20).unwrap();
        let lo = el.semi_major_axis * (1.0 - el.eccentricity);
        let hi = el.semi_major_axis * (1.0 + el.eccentricity);
        for k in 0..50 {
            let r = el.position_at(k as f64 * 13.7).norm();
            assert!(r >= lo * 0.999_999 && r <= hi * 1.000_001, "r = {r}");
        }
    }

    #[test]
    fn true_mean_conversion_roundtrips() {
        for &e in &[0.0, 0.1, 0.4, 0.7] {
            for k in 0..24 {
                let v = 2.0 * PI * k as f64 / 24.0;
                let back = true_from_mean(mean_from_true(v, e), e);
                let diff = (back - v).abs().min(2.0 * PI - (back - v).abs());
                assert!(diff < 1e-8, "e={e} v={v} back={back}");
            }
        }
    }

    #[test]
    fn invalid_elements_are_rejected() {
        assert!(OrbitalElements::new(1.0e11, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0e20).is_err());
        assert!(OrbitalElements::new(1.0e11, -0.1, 0.0, 0.0, 0.0, 0.0, 1.0e20).is_err());
        assert!(OrbitalElements::new(0.0, 0.5, 0.0, 0.0, 0.0, 0.0, 1.0e20).is_err());
        assert!(OrbitalElements::new(1.0e11, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn periapsis_lies_along_periapsis_axis() {
        // At E = 0 the point sits at distance a(1-e) along the rotated x-axis.
        let el =
            OrbitalElements::new(1.0e11, 0.4, 0.3, 0.9, 2.1, 0.0, 1.327e20).unwrap();
        let peri = el.orbit_path(4)[0];
        assert!((peri.norm() - 1.0e11 * 0.6).abs() < 1.0);
        let axis = el.orientation() * Vector3::new(1.0, 0.0, 0.0);
        let cosine = peri.dot(&axis) / peri.norm();
        assert!((cosine - 1.0).abs() < 1e-9, "not along periapsis axis: {cosine}");
    }
}
