use std::f64::consts::PI;

use super::{cross, lerp, norm, normalize};

/// Default number of samples per arc.
pub const DEFAULT_SAMPLES: usize = 50;
/// Peak height of the arc above the sphere surface.
pub const DEFAULT_BULGE_AMPLITUDE: f64 = 0.04;

/// Shape parameters for a raised arc between two sphere points.
#[derive(Debug, Clone, Copy)]
pub struct ArcStyle {
    pub samples: usize,
    pub bulge_amplitude: f64,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            bulge_amplitude: DEFAULT_BULGE_AMPLITUDE,
        }
    }
}

/// Chord midpoints shorter than this mean the endpoints are close enough to
/// antipodal that walking the chord degenerates.
const MIN_CHORD_MIDPOINT: f64 = 1e-3;

/// Build a raised arc between two unit-sphere points.
///
/// Each sample lerps along the chord, gets pulled back onto the sphere
/// surface, then is pushed outward by a sine-weighted bulge that is zero at
/// both endpoints and maximal at the midpoint. The first sample coincides
/// with `p1`; the last sits at fraction (N-1)/N and approaches `p2`.
///
/// Antipodal endpoints put the chord midpoint at the sphere's center, where
/// normalization turns rounding noise into an arbitrary direction and the
/// path collapses into two straight segments through the interior. Those
/// pairs instead walk a great semicircle through a perpendicular waypoint.
pub fn build_arc(p1: [f64; 3], p2: [f64; 3], style: &ArcStyle) -> Vec<[f64; 3]> {
    let n = style.samples;
    let waypoint = if norm(lerp(p1, p2, 0.5)) < MIN_CHORD_MIDPOINT {
        Some(perpendicular(p1))
    } else {
        None
    };
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / n as f64;
        let surface = match waypoint {
            Some(axis) => {
                let (sin, cos) = (PI * t).sin_cos();
                [
                    p1[0] * cos + axis[0] * sin,
                    p1[1] * cos + axis[1] * sin,
                    p1[2] * cos + axis[2] * sin,
                ]
            }
            None => normalize(lerp(p1, p2, t)),
        };
        let bulge = style.bulge_amplitude * (PI * t).sin();
        points.push([
            surface[0] * (1.0 + bulge),
            surface[1] * (1.0 + bulge),
            surface[2] * (1.0 + bulge),
        ]);
    }
    points
}

// Unit vector orthogonal to `p`, seeded from whichever axis `p` is
// furthest from.
fn perpendicular(p: [f64; 3]) -> [f64; 3] {
    let seed = if p[0].abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };
    normalize(cross(p, seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::geospatial::{coordinates::project, norm};

    const TOL: f64 = 1e-6;

    fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
        norm([a[0] - b[0], a[1] - b[1], a[2] - b[2]])
    }

    #[test]
    fn arc_has_the_requested_sample_count() {
        let p1 = project(0.0, 0.0);
        let p2 = project(90.0, 0.0);
        assert_eq!(build_arc(p1, p2, &ArcStyle::default()).len(), 50);

        let custom = ArcStyle {
            samples: 12,
            ..ArcStyle::default()
        };
        assert_eq!(build_arc(p1, p2, &custom).len(), 12);
    }

    #[test]
    fn arc_touches_down_at_the_start() {
        let p1 = project(33.9416, -118.4085);
        let p2 = project(55.7558, 37.6173);
        let arc = build_arc(p1, p2, &ArcStyle::default());
        assert!(distance(arc[0], p1) < TOL);
    }

    #[test]
    fn arc_approaches_the_far_endpoint() {
        let p1 = project(0.0, 0.0);
        let p2 = project(90.0, 0.0);
        let arc = build_arc(p1, p2, &ArcStyle::default());
        let last = arc[arc.len() - 1];
        // Last sample sits at t = 49/50, one step shy of p2.
        assert!(distance(last, p2) < 0.05);
    }

    #[test]
    fn midpoint_bulges_by_the_amplitude() {
        let style = ArcStyle::default();
        let p1 = project(15.6677, -96.5545);
        let p2 = project(33.9416, -118.4085);
        let arc = build_arc(p1, p2, &style);
        let mid = arc[arc.len() / 2];
        assert!((norm(mid) - (1.0 + style.bulge_amplitude)).abs() < 1e-3);
    }

    #[test]
    fn pole_to_pole_arc_has_no_sharp_kinks() {
        let north = project(90.0, 0.0);
        let south = project(-90.0, 0.0);
        let arc = build_arc(north, south, &ArcStyle::default());

        // A smooth half-circumference path over 50 samples steps roughly
        // pi/50 at a time; a chord collapse jumps by the sphere's diameter.
        let max_step = arc
            .windows(2)
            .map(|w| distance(w[0], w[1]))
            .fold(0.0, f64::max);
        assert!(max_step < 0.1, "largest adjacent-sample jump: {max_step}");

        assert!(distance(arc[0], north) < TOL);
        assert!(distance(arc[arc.len() - 1], south) < 0.1);
        for p in &arc {
            assert!(norm(*p) >= 1.0 - TOL);
            assert!(norm(*p) <= 1.0 + DEFAULT_BULGE_AMPLITUDE + TOL);
        }
    }

    #[test]
    fn antipodal_arc_still_bulges_at_the_midpoint() {
        let style = ArcStyle::default();
        let arc = build_arc(project(90.0, 0.0), project(-90.0, 0.0), &style);
        let mid = arc[arc.len() / 2];
        assert!((norm(mid) - (1.0 + style.bulge_amplitude)).abs() < 1e-3);
    }

    #[test]
    fn radii_rise_then_fall_and_never_dip_below_the_surface() {
        let p1 = project(-34.6037, -58.3816);
        let p2 = project(55.7558, 37.6173);
        let arc = build_arc(p1, p2, &ArcStyle::default());
        let radii: Vec<f64> = arc.iter().map(|p| norm(*p)).collect();
        let peak = radii
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        for r in &radii {
            assert!(*r >= 1.0 - TOL);
        }
        for w in radii[..=peak].windows(2) {
            assert!(w[1] >= w[0] - TOL);
        }
        for w in radii[peak..].windows(2) {
            assert!(w[1] <= w[0] + TOL);
        }
    }
}
