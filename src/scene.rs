use anyhow::{Context, Result};
use tracing::info;

use crate::systems::geospatial::arc::{build_arc, ArcStyle};
use crate::systems::geospatial::coordinates::{parse_latitude, parse_longitude, project};

pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
pub const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
pub const ARC_ORANGE: [f32; 4] = [1.0, 0.55, 0.0, 1.0];

/// One row of the caller-supplied coordinate table.
#[derive(Debug, Clone, Copy)]
pub struct PinSpec {
    pub name: &'static str,
    pub latitude: &'static str,
    pub longitude: &'static str,
    pub color: [f32; 4],
}

/// The demo's coordinate table. Order matters: each pin connects to the
/// next one, so this is also the arc routing.
pub fn default_pin_table() -> Vec<PinSpec> {
    vec![
        PinSpec { name: "mazunte", latitude: "15.6677N", longitude: "96.5545W", color: RED },
        PinSpec { name: "lax", latitude: "33.9416N", longitude: "118.4085W", color: GREEN },
        PinSpec { name: "moscow", latitude: "55.7558N", longitude: "37.6173E", color: BLUE },
        PinSpec { name: "buenosAires", latitude: "34.6037S", longitude: "58.3816W", color: YELLOW },
        PinSpec { name: "northPole", latitude: "90N", longitude: "0", color: BLUE },
        PinSpec { name: "southPole", latitude: "90S", longitude: "0", color: RED },
        PinSpec { name: "zeroZero", latitude: "0", longitude: "0", color: RED },
    ]
}

/// A placed pin: parsed degrees plus its unit-sphere position.
/// Built once during assembly and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct NamedPin {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub position: [f64; 3],
    pub color: [f32; 4],
}

/// A raised arc between two consecutive pins.
#[derive(Debug, Clone)]
pub struct ArcPath {
    pub from: String,
    pub to: String,
    pub points: Vec<[f64; 3]>,
    pub color: [f32; 4],
}

/// Everything the renderer needs: pins in table order and the arcs
/// connecting them.
#[derive(Debug, Clone, Default)]
pub struct SceneLayout {
    pub pins: Vec<NamedPin>,
    pub arcs: Vec<ArcPath>,
}

impl SceneLayout {
    /// Look up a pin's unit-sphere position by name.
    pub fn point_of(&self, name: &str) -> Option<[f64; 3]> {
        self.pins.iter().find(|p| p.name == name).map(|p| p.position)
    }
}

/// Parse and project every table entry, then connect consecutive pins.
///
/// Arcs are only built once all pins exist; the last pin has no successor
/// and simply produces no arc.
pub fn assemble_scene(table: &[PinSpec], style: &ArcStyle) -> Result<SceneLayout> {
    let mut pins = Vec::with_capacity(table.len());
    for spec in table {
        let latitude = parse_latitude(spec.latitude)
            .with_context(|| format!("pin {:?}: bad latitude", spec.name))?;
        let longitude = parse_longitude(spec.longitude)
            .with_context(|| format!("pin {:?}: bad longitude", spec.name))?;
        let position = project(latitude, longitude);
        info!(
            name = spec.name,
            latitude,
            longitude,
            x = position[0],
            y = position[1],
            z = position[2],
            "placed pin"
        );
        pins.push(NamedPin {
            name: spec.name.to_string(),
            latitude,
            longitude,
            position,
            color: spec.color,
        });
    }

    let arcs = pins
        .windows(2)
        .map(|pair| ArcPath {
            from: pair[0].name.clone(),
            to: pair[1].name.clone(),
            points: build_arc(pair[0].position, pair[1].position, style),
            color: ARC_ORANGE,
        })
        .collect();

    Ok(SceneLayout { pins, arcs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::geospatial::norm;

    const TOL: f64 = 1e-6;

    #[test]
    fn default_table_assembles_in_order() {
        let layout = assemble_scene(&default_pin_table(), &ArcStyle::default()).unwrap();
        let names: Vec<&str> = layout.pins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["mazunte", "lax", "moscow", "buenosAires", "northPole", "southPole", "zeroZero"]
        );
        assert_eq!(layout.arcs.len(), layout.pins.len() - 1);
        assert_eq!(layout.arcs[0].from, "mazunte");
        assert_eq!(layout.arcs[0].to, "lax");
    }

    #[test]
    fn point_lookup_resolves_known_pins_only() {
        let layout = assemble_scene(&default_pin_table(), &ArcStyle::default()).unwrap();
        let north = layout.point_of("northPole").unwrap();
        assert!((north[1] - 1.0).abs() < TOL);
        assert!(layout.point_of("atlantis").is_none());
    }

    #[test]
    fn two_pin_table_end_to_end() {
        let table = [
            PinSpec { name: "a", latitude: "0", longitude: "0", color: RED },
            PinSpec { name: "b", latitude: "90N", longitude: "0", color: RED },
        ];
        let layout = assemble_scene(&table, &ArcStyle::default()).unwrap();
        assert_eq!(layout.pins.len(), 2);
        assert_eq!(layout.arcs.len(), 1);

        let a = layout.point_of("a").unwrap();
        let b = layout.point_of("b").unwrap();
        assert!((a[0] + 1.0).abs() < TOL && a[1].abs() < TOL);
        assert!(b[0].abs() < TOL && (b[1] - 1.0).abs() < TOL);

        let arc = &layout.arcs[0];
        assert_eq!(arc.points.len(), 50);
        for p in &arc.points {
            assert!(norm(*p) >= 1.0 - TOL);
        }
        let first = arc.points[0];
        assert!(norm([first[0] - a[0], first[1] - a[1], first[2] - a[2]]) < TOL);
        let last = arc.points[49];
        assert!(norm([last[0] - b[0], last[1] - b[1], last[2] - b[2]]) < 0.05);
    }

    #[test]
    fn single_pin_produces_no_arcs() {
        let table = [PinSpec { name: "solo", latitude: "0", longitude: "0", color: RED }];
        let layout = assemble_scene(&table, &ArcStyle::default()).unwrap();
        assert_eq!(layout.pins.len(), 1);
        assert!(layout.arcs.is_empty());
    }

    #[test]
    fn broken_entries_name_the_offending_pin() {
        let table = [PinSpec { name: "broken", latitude: "oops", longitude: "0", color: RED }];
        let err = assemble_scene(&table, &ArcStyle::default()).unwrap_err();
        assert!(format!("{err:#}").contains("broken"));
    }
}
