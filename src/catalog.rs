//! The planet catalog: real solar-system bodies and their hierarchy.
//!
//! Built once at startup and read-only afterwards. Positions resolve
//! recursively through each body's parent, so the Moon rides along with
//! Earth the same way the planets ride around the Sun.

use crate::elements::{mean_from_true, ElementError, OrbitalElements};
use nalgebra::Vector3;
use thiserror::Error;

/// One astronomical unit in meters.
pub const AU: f64 = 1.495_978_707e11;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Element(#[from] ElementError),
    #[error("{name}: parent index {parent} does not precede it in the catalog")]
    ParentOrder { name: String, parent: usize },
    #[error("missing parent body {body}")]
    MissingParent { body: &'static str },
}

/// A single body: fixed orbital elements plus display attributes.
///
/// The central body carries no elements and no parent. Immutable after
/// construction; all fields are plain data.
#[derive(Clone, Debug)]
pub struct Planet {
    pub name: String,
    pub elements: Option<OrbitalElements>,
    /// Gravitational parameter of this body itself (used by its satellites).
    pub mu: f64,
    /// Radius used when drawing the body, in meters.
    pub display_radius: f64,
    pub color: [u8; 3],
    pub parent: Option<usize>,
}

impl Planet {
    pub fn central(name: &str, mu: f64, display_radius: f64, color: [u8; 3]) -> Self {
        Self {
            name: name.to_owned(),
            elements: None,
            mu,
            display_radius,
            color,
            parent: None,
        }
    }

    pub fn orbiting(
        name: &str,
        parent: usize,
        elements: OrbitalElements,
        mu: f64,
        display_radius: f64,
        color: [u8; 3],
    ) -> Self {
        Self {
            name: name.to_owned(),
            elements: Some(elements),
            mu,
            display_radius,
            color,
            parent: Some(parent),
        }
    }
}

struct PlanetRow {
    name: &'static str,
    a_au: f64,
    e: f64,
    /// Inclination, node, periapsis and epoch true anomaly in degrees.
    i: f64,
    node: f64,
    peri: f64,
    v0: f64,
    mu: f64,
    radius: f64,
    color: [u8; 3],
}

const PLANET_TABLE: [PlanetRow; 8] = [
    PlanetRow { name: "Mercury", a_au: 0.3871, e: 0.20564, i: 7.006, node: 48.34, peri: 77.46, v0: 232.007_496_117_283_6, mu: 2.2032e13, radius: 4.879e6, color: [169, 169, 169] },
    PlanetRow { name: "Venus", a_au: 0.7233, e: 0.00676, i: 3.398, node: 76.67, peri: 131.77, v0: 181.98, mu: 3.248_59e14, radius: 1.2104e7, color: [230, 190, 138] },
    PlanetRow { name: "Earth", a_au: 1.0, e: 0.016_710_22, i: 0.00005, node: 0.0, peri: 102.93, v0: 102.347_718_948_967_45, mu: 3.986_004_418e14, radius: 1.2742e7, color: [70, 130, 220] },
    PlanetRow { name: "Mars", a_au: 1.5237, e: 0.09337, i: 1.852, node: 49.71, peri: 336.08, v0: 354.467_276_212_050_1, mu: 4.282_837e13, radius: 6.779e6, color: [214, 94, 56] },
    PlanetRow { name: "Jupiter", a_au: 5.2025, e: 0.04854, i: 1.299, node: 100.29, peri: 14.27, v0: 34.33, mu: 1.266_865_34e17, radius: 1.3982e8, color: [216, 172, 122] },
    PlanetRow { name: "Saturn", a_au: 9.5415, e: 0.05551, i: 2.494, node: 113.64, peri: 92.86, v0: 50.08, mu: 3.793_118_7e16, radius: 1.1646e8, color: [226, 196, 132] },
    PlanetRow { name: "Uranus", a_au: 19.188, e: 0.04686, i: 0.773, node: 73.96, peri: 172.43, v0: 314.20, mu: 5.793_939e15, radius: 5.0724e7, color: [147, 205, 222] },
    PlanetRow { name: "Neptune", a_au: 30.070, e: 0.00895, i: 1.770, node: 131.79, peri: 46.68, v0: 304.22, mu: 6.836_529e15, radius: 4.9244e7, color: [91, 122, 229] },
];

/// Read-only, ordered collection of bodies. Parents always precede their
/// satellites, which bounds the position recursion.
pub struct PlanetCatalog {
    bodies: Vec<Planet>,
}

impl PlanetCatalog {
    /// The real solar system: Sun, eight planets, and the Moon.
    pub fn solar_system() -> Result<Self, CatalogError> {
        let sun = Planet::central("Sun", 1.327_124_400_18e20, 4.0 * 1.392e9, [255, 204, 64]);
        let sun_mu = sun.mu;
        let mut bodies = vec![sun];

        for row in &PLANET_TABLE {
            let elements = OrbitalElements::new(
                row.a_au * AU,
                row.e,
                row.i.to_radians(),
                row.node.to_radians(),
                row.peri.to_radians(),
                mean_from_true(row.v0.to_radians(), row.e),
                sun_mu,
            )?;
            bodies.push(Planet::orbiting(row.name, 0, elements, row.mu, row.radius, row.color));
        }

        let earth = bodies
            .iter()
            .position(|b| b.name == "Earth")
            .ok_or(CatalogError::MissingParent { body: "Moon" })?;
        let moon_elements = OrbitalElements::new(
            3.8844e8,
            0.0549,
            5.145_f64.to_radians(),
            0.0,
            0.0,
            mean_from_true(0.0, 0.0549),
            bodies[earth].mu,
        )?;
        bodies.push(Planet::orbiting(
            "Moon",
            earth,
            moon_elements,
            4.902_869_5e12,
            1.7374e6,
            [178, 178, 178],
        ));

        Self::from_bodies(bodies)
    }

    /// Build a catalog from explicit bodies, checking the parent ordering.
    pub fn from_bodies(bodies: Vec<Planet>) -> Result<Self, CatalogError> {
        for (idx, body) in bodies.iter().enumerate() {
            if let Some(parent) = body.parent {
                if parent >= idx {
                    return Err(CatalogError::ParentOrder {
                        name: body.name.clone(),
                        parent,
                    });
                }
            }
        }
        Ok(Self { bodies })
    }

    pub fn bodies(&self) -> &[Planet] {
        &self.bodies
    }

    pub fn get(&self, name: &str) -> Option<&Planet> {
        self.bodies.iter().find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Absolute position of a body at `t_days` since J2000, resolved
    /// through its parent chain.
    pub fn position(&self, index: usize, t_days: f64) -> Vector3<f64> {
        let body = &self.bodies[index];
        let parent = body
            .parent
            .map(|p| self.position(p, t_days))
            .unwrap_or_else(Vector3::zeros);
        match &body.elements {
            Some(el) => parent + el.position_at(t_days),
            None => parent,
        }
    }

    /// Largest semi-major axis, used for axis limits.
    pub fn max_extent(&self) -> f64 {
        self.bodies
            .iter()
            .filter_map(|b| b.elements.as_ref())
            .map(|el| el.semi_major_axis)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solar_system_builds_with_all_bodies() {
        let catalog = PlanetCatalog::solar_system().unwrap();
        assert_eq!(catalog.bodies().len(), 10);
        assert!(catalog.get("earth").is_some());
        assert!(catalog.get("Neptune").is_some());
        assert!(catalog.get("Vulcan").is_none());
    }

    #[test]
    fn moon_is_parented_to_earth() {
        let catalog = PlanetCatalog::solar_system().unwrap();
        let moon = catalog.get("Moon").unwrap();
        let parent = moon.parent.unwrap();
        assert_eq!(catalog.bodies()[parent].name, "Earth");
    }

    #[test]
    fn earth_epoch_position_is_consistent_with_ephemeris() {
        let catalog = PlanetCatalog::solar_system().unwrap();
        let earth = catalog
            .bodies()
            .iter()
            .position(|b| b.name == "Earth")
            .unwrap();
        let pos = catalog.position(earth, 0.0);
        let el = catalog.bodies()[earth].elements.unwrap();

        // Distance must fall in the perihelion-apoapsis band around 1 AU.
        let r = pos.norm();
        let lo = el.semi_major_axis * (1.0 - el.eccentricity);
        let hi = el.semi_major_axis * (1.0 + el.eccentricity);
        assert!(r >= lo && r <= hi, "r = {} AU", r / AU);

        // Earth's inclination is 0.00005 deg; the position sits in the ecliptic.
        assert!(pos.z.abs() < el.semi_major_axis * 1e-5, "z = {}", pos.z);
    }

    #[test]
    fn moon_stays_near_earth() {
        let catalog = PlanetCatalog::solar_system().unwrap();
        let earth = catalog.bodies().iter().position(|b| b.name == "Earth").unwrap();
        let moon = catalog.bodies().iter().position(|b| b.name == "Moon").unwrap();
        let el = catalog.bodies()[moon].elements.unwrap();
        for k in 0..12 {
            let t = k as f64 * 5.3;
            let d = (catalog.position(moon, t) - catalog.position(earth, t)).norm();
            let lo = el.semi_major_axis * (1.0 - el.eccentricity);
            let hi = el.semi_major_axis * (1.0 + el.eccentricity);
            assert!(d >= lo * 0.999 && d <= hi * 1.001, "t={t} d={d}");
        }
    }

    #[test]
    fn max_extent_is_neptunes_orbit() {
        let catalog = PlanetCatalog::solar_system().unwrap();
        let neptune = catalog.get("Neptune").unwrap().elements.unwrap();
        assert_eq!(catalog.max_extent(), neptune.semi_major_axis);
    }

    #[test]
    fn out_of_order_parent_is_rejected() {
        let el = OrbitalElements::new(1.0e11, 0.1, 0.0, 0.0, 0.0, 0.0, 1.3e20).unwrap();
        let bodies = vec![Planet::orbiting("Orphan", 2, el, 1.0e13, 1.0e6, [0, 0, 0])];
        assert!(PlanetCatalog::from_bodies(bodies).is_err());
    }
}
