use std::fmt;

/// Failure to turn a coordinate string into signed degrees.
///
/// Callers must surface these rather than fall back to zero; a pin with a
/// broken coordinate should never be silently placed at an arbitrary spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    /// The string held no leading digits to parse, e.g. "N90" or "".
    MissingMagnitude(String),
    /// The leading numeric run did not parse as a float, e.g. "1.2.3N".
    InvalidMagnitude(String),
    /// The trailing letter was not a hemisphere letter for this axis,
    /// e.g. "90E" as a latitude.
    InvalidHemisphere { axis: &'static str, suffix: String },
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::MissingMagnitude(raw) => {
                write!(f, "coordinate {:?} has no numeric part", raw)
            }
            CoordinateError::InvalidMagnitude(raw) => {
                write!(f, "coordinate {:?} has a malformed numeric part", raw)
            }
            CoordinateError::InvalidHemisphere { axis, suffix } => {
                write!(f, "{:?} is not a valid {} hemisphere letter", suffix, axis)
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

/// Parse a latitude string such as "15.6677N", "90S", or a bare "0".
///
/// 'S' negates, 'N' and an absent letter leave the value positive.
pub fn parse_latitude(raw: &str) -> Result<f64, CoordinateError> {
    parse_axis(raw, 'S', 'N', "latitude")
}

/// Parse a longitude string such as "96.5545W", "37.6173E", or a bare "0".
///
/// 'W' negates, 'E' and an absent letter leave the value positive.
pub fn parse_longitude(raw: &str) -> Result<f64, CoordinateError> {
    parse_axis(raw, 'W', 'E', "longitude")
}

// Latitude and longitude stay as two separately parameterized entry points;
// the negative letter is spelled out at each call site instead of threading
// a boolean through shared code.
fn parse_axis(
    raw: &str,
    negative: char,
    positive: char,
    axis: &'static str,
) -> Result<f64, CoordinateError> {
    let trimmed = raw.trim();
    let magnitude_end = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(trimmed.len());
    let (magnitude, suffix) = trimmed.split_at(magnitude_end);
    let suffix = suffix.trim();

    if magnitude.is_empty() {
        return Err(CoordinateError::MissingMagnitude(raw.to_string()));
    }
    let value: f64 = magnitude
        .parse()
        .map_err(|_| CoordinateError::InvalidMagnitude(raw.to_string()))?;

    let mut letters = suffix.chars();
    match (letters.next(), letters.next()) {
        (None, _) => Ok(value),
        (Some(letter), None) if letter.eq_ignore_ascii_case(&negative) => Ok(-value),
        (Some(letter), None) if letter.eq_ignore_ascii_case(&positive) => Ok(value),
        _ => Err(CoordinateError::InvalidHemisphere {
            axis,
            suffix: suffix.to_string(),
        }),
    }
}

/// Project signed degrees onto the unit sphere.
///
/// Latitude becomes the polar angle phi (0 at the north pole, pi at the
/// south pole) and longitude the azimuthal angle theta, offset by 180 so the
/// generated equirectangular texture's prime meridian lines up with lon 0.
///
/// Convention: the x term is `+sin(phi) * cos(theta)`, fixed once here. The
/// sphere mesh UVs are derived from the same parameterization, so pins and
/// texture cannot drift apart.
pub fn project(latitude: f64, longitude: f64) -> [f64; 3] {
    let phi = (90.0 - latitude).to_radians();
    let theta = (longitude + 180.0).to_radians();
    [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()]
}

/// Parse a coordinate pair and project it in one step.
pub fn project_coordinate(latitude: &str, longitude: &str) -> Result<[f64; 3], CoordinateError> {
    Ok(project(parse_latitude(latitude)?, parse_longitude(longitude)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::geospatial::{angle_between, norm};

    const TOL: f64 = 1e-6;

    #[test]
    fn latitude_signs_follow_hemisphere_letters() {
        assert_eq!(parse_latitude("15.6677N").unwrap(), 15.6677);
        assert_eq!(parse_latitude("34.6037S").unwrap(), -34.6037);
        assert_eq!(parse_latitude("90N").unwrap(), 90.0);
        assert_eq!(parse_latitude("90S").unwrap(), -90.0);
        assert_eq!(parse_latitude("0").unwrap(), 0.0);
    }

    #[test]
    fn longitude_signs_follow_hemisphere_letters() {
        assert_eq!(parse_longitude("96.5545W").unwrap(), -96.5545);
        assert_eq!(parse_longitude("37.6173E").unwrap(), 37.6173);
        assert_eq!(parse_longitude("118.4085w").unwrap(), -118.4085);
        assert_eq!(parse_longitude("0").unwrap(), 0.0);
    }

    #[test]
    fn hemisphere_letters_are_case_insensitive() {
        assert_eq!(parse_latitude("90n").unwrap(), parse_latitude("90N").unwrap());
        assert_eq!(parse_latitude("45.5s").unwrap(), parse_latitude("45.5S").unwrap());
        assert_eq!(parse_longitude("12e").unwrap(), parse_longitude("12E").unwrap());
    }

    #[test]
    fn malformed_magnitudes_are_rejected() {
        assert!(matches!(
            parse_latitude("N90"),
            Err(CoordinateError::MissingMagnitude(_))
        ));
        assert!(matches!(
            parse_latitude(""),
            Err(CoordinateError::MissingMagnitude(_))
        ));
        assert!(matches!(
            parse_latitude("1.2.3N"),
            Err(CoordinateError::InvalidMagnitude(_))
        ));
    }

    #[test]
    fn wrong_axis_letters_are_rejected() {
        assert!(matches!(
            parse_latitude("90E"),
            Err(CoordinateError::InvalidHemisphere {
                axis: "latitude",
                ..
            })
        ));
        assert!(matches!(
            parse_longitude("90N"),
            Err(CoordinateError::InvalidHemisphere {
                axis: "longitude",
                ..
            })
        ));
        assert!(parse_longitude("90 NW").is_err());
    }

    #[test]
    fn poles_project_onto_the_y_axis() {
        let north = project(90.0, 0.0);
        let south = project(-90.0, 0.0);
        assert!(north[0].abs() < TOL && (north[1] - 1.0).abs() < TOL && north[2].abs() < TOL);
        assert!(south[0].abs() < TOL && (south[1] + 1.0).abs() < TOL && south[2].abs() < TOL);
    }

    #[test]
    fn equator_sits_at_zero_height() {
        let p = project(0.0, 0.0);
        assert!(p[1].abs() < TOL);
        // theta = 180 degrees under the fixed x-sign convention
        assert!((p[0] + 1.0).abs() < TOL);
    }

    #[test]
    fn every_projection_lands_on_the_unit_sphere() {
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lon = -180.0;
            while lon <= 180.0 {
                let p = project(lat, lon);
                assert!(
                    (norm(p) - 1.0).abs() < TOL,
                    "|project({lat}, {lon})| = {}",
                    norm(p)
                );
                lon += 15.0;
            }
            lat += 15.0;
        }
    }

    #[test]
    fn poles_are_antipodal() {
        let north = project_coordinate("90N", "0").unwrap();
        let south = project_coordinate("90S", "0").unwrap();
        assert!((angle_between(north, south) - std::f64::consts::PI).abs() < TOL);
    }

    #[test]
    fn parse_errors_propagate_through_projection() {
        assert!(project_coordinate("garbage", "0").is_err());
        assert!(project_coordinate("0", "garbage").is_err());
    }
}
