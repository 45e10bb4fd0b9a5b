//! Viewing configuration and the 3D-to-2D plane projection.
//!
//! A view is three rotation angles plus a zoom factor. Projection rotates
//! the viewing-plane basis by phi/psi/theta (x, then y, then z) and takes
//! the coordinates of a point along the rotated u/v axes, scaled by zoom.
//! Pure functions of their inputs; no hidden state.

use crate::math::{rotate_x, rotate_y, rotate_z};
use nalgebra::{Matrix3, Vector3};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Viewing angles in degrees plus a linear zoom factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    pub phi: f64,
    pub psi: f64,
    pub theta: f64,
    pub zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { phi: 0.0, psi: 0.0, theta: 0.0, zoom: 1.0 }
    }
}

impl ViewConfig {
    pub fn new(phi: f64, psi: f64, theta: f64, zoom: f64) -> Self {
        Self { phi, psi, theta, zoom }
    }

    /// Rotation applied to the viewing-plane basis: Rz(theta) Ry(psi) Rx(phi).
    pub fn rotation(&self) -> Matrix3<f64> {
        rotate_z(self.theta.to_radians())
            * rotate_y(self.psi.to_radians())
            * rotate_x(self.phi.to_radians())
    }

    /// Project a single point onto the viewing plane.
    ///
    /// With zero angles and zoom 1 this returns (x, y) of the input.
    pub fn project_point(&self, point: &Vector3<f64>) -> [f64; 2] {
        let local = self.rotation().transpose() * point;
        [self.zoom * local.x, self.zoom * local.y]
    }

    /// Project a batch of points; identical semantics to `project_point`.
    pub fn project_path(&self, points: &[Vector3<f64>]) -> Vec<[f64; 2]> {
        let inverse = self.rotation().transpose();
        points
            .iter()
            .map(|p| {
                let local = inverse * p;
                [self.zoom * local.x, self.zoom * local.y]
            })
            .collect()
    }
}

/// Capability interface between the windowing toolkit and the viewer state.
///
/// The UI layer reports control changes through these methods only; the
/// recompute/redraw logic stays independent of any particular toolkit.
pub trait ViewEvents {
    fn on_time_change(&mut self, day_offset: f64);
    fn on_angle_change(&mut self, phi: f64, psi: f64, theta: f64);
    fn on_zoom_change(&mut self, zoom: f64);
}
