//! Builds the renderable scene for one (catalog, time, view) triple.
//!
//! Everything here is recomputed per render; the viewer and the picture
//! export consume the same structures.

use crate::catalog::PlanetCatalog;
use crate::time::j2000_days;
use crate::view::ViewConfig;
use chrono::{DateTime, Utc};
use nalgebra::Vector3;

/// Samples along a full orbit outline.
pub const ORBIT_SAMPLES: usize = 200;
/// Samples along the trailing arc.
pub const TRAIL_SAMPLES: usize = 32;
/// The trail covers the most recent twelfth of the orbital period.
pub const TRAIL_FRACTION: f64 = 1.0 / 12.0;

/// Projected geometry for a single body.
pub struct BodyTrace {
    pub name: String,
    pub color: [u8; 3],
    /// Current position on the viewing plane.
    pub position: [f64; 2],
    /// Dashed full-orbit outline; None for the central body.
    pub outline: Option<Vec<[f64; 2]>>,
    /// Recent motion, oldest point first; None for the central body.
    pub trail: Option<Vec<[f64; 2]>>,
    /// Apparent orbit size on the plane (semi-major axis times zoom);
    /// used to suppress labels on orbits too small to matter.
    pub apparent_size: f64,
    /// Display radius of the body itself in projected units.
    pub body_radius: f64,
}

pub struct Scene {
    pub traces: Vec<BodyTrace>,
    /// Half-range of the square drawing area, in projected units at zoom 1.
    pub extent: f64,
    pub timestamp: DateTime<Utc>,
}

/// Margin applied on top of the largest orbit so apoapsis points stay inside.
const EXTENT_MARGIN: f64 = 1.05;

pub fn build_scene(catalog: &PlanetCatalog, time: DateTime<Utc>, view: &ViewConfig) -> Scene {
    let t = j2000_days(time);
    let mut traces = Vec::with_capacity(catalog.bodies().len());

    for (index, body) in catalog.bodies().iter().enumerate() {
        let position = view.project_point(&catalog.position(index, t));

        let (outline, trail, apparent_size) = match (&body.elements, body.parent) {
            (Some(el), Some(parent)) => {
                let parent_pos = catalog.position(parent, t);
                let path: Vec<Vector3<f64>> = el
                    .orbit_path(ORBIT_SAMPLES)
                    .into_iter()
                    .map(|p| parent_pos + p)
                    .collect();

                let span = TRAIL_FRACTION * el.period_days();
                let trail_points: Vec<Vector3<f64>> = (0..=TRAIL_SAMPLES)
                    .map(|k| {
                        let back = span * (1.0 - k as f64 / TRAIL_SAMPLES as f64);
                        catalog.position(index, t - back)
                    })
                    .collect();

                (
                    Some(view.project_path(&path)),
                    Some(view.project_path(&trail_points)),
                    el.semi_major_axis * view.zoom,
                )
            }
            _ => (None, None, 0.0),
        };

        traces.push(BodyTrace {
            name: body.name.clone(),
            color: body.color,
            position,
            outline,
            trail,
            apparent_size,
            body_radius: body.display_radius * view.zoom,
        });
    }

    Scene {
        traces,
        extent: catalog.max_extent() * EXTENT_MARGIN,
        timestamp: time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Planet, PlanetCatalog};
    use crate::elements::OrbitalElements;
    use crate::time::J2000_EPOCH;

    fn toy_catalog(eccentricity: f64) -> PlanetCatalog {
        let star = Planet::central("Star", 1.327e20, 1.0e9, [255, 255, 0]);
        let el = OrbitalElements::new(
            1.0e11,
            eccentricity,
            0.0,
            0.0,
            0.0,
            0.0,
            star.mu,
        )
        .unwrap();
        let planet = Planet::orbiting("P", 0, el, 1.0e14, 1.0e7, [0, 0, 255]);
        PlanetCatalog::from_bodies(vec![star, planet]).unwrap()
    }

    #[test]
    fn circular_outline_is_a_circle_of_radius_a() {
        let catalog = toy_catalog(0.0);
        let scene = build_scene(&catalog, *J2000_EPOCH, &ViewConfig::default());
        let outline = scene.traces[1].outline.as_ref().unwrap();
        assert_eq!(outline.len(), ORBIT_SAMPLES + 1);
        for p in outline {
            let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!((r - 1.0e11).abs() < 1.0, "r = {r}");
        }
    }

    #[test]
    fn central_body_has_no_outline_or_trail() {
        let catalog = toy_catalog(0.1);
        let scene = build_scene(&catalog, *J2000_EPOCH, &ViewConfig::default());
        assert!(scene.traces[0].outline.is_none());
        assert!(scene.traces[0].trail.is_none());
        assert_eq!(scene.traces[0].position, [0.0, 0.0]);
    }

    #[test]
    fn trail_ends_at_current_position() {
        let catalog = toy_catalog(0.2);
        let view = ViewConfig::new(15.0, -40.0, 5.0, 0.7);
        let scene = build_scene(&catalog, *J2000_EPOCH, &view);
        let trace = &scene.traces[1];
        let last = *trace.trail.as_ref().unwrap().last().unwrap();
        assert_eq!(last, trace.position);
    }

    #[test]
    fn scene_is_deterministic() {
        let catalog = PlanetCatalog::solar_system().unwrap();
        let view = ViewConfig::new(-70.0, 0.0, 0.0, 0.4);
        let a = build_scene(&catalog, *J2000_EPOCH, &view);
        let b = build_scene(&catalog, *J2000_EPOCH, &view);
        assert_eq!(a.traces.len(), b.traces.len());
        for (ta, tb) in a.traces.iter().zip(&b.traces) {
            assert_eq!(ta.position, tb.position);
            assert_eq!(ta.outline, tb.outline);
            assert_eq!(ta.trail, tb.trail);
        }
    }

    #[test]
    fn extent_covers_the_largest_orbit() {
        let catalog = toy_catalog(0.3);
        let scene = build_scene(&catalog, *J2000_EPOCH, &ViewConfig::default());
        assert!(scene.extent > 1.0e11);
        assert!(scene.extent < 1.1e11);
    }
}
