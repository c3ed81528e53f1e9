//! Office geofence containment.

use crate::config::MAX_ACCURACY_ALLOWANCE_METERS;
use crate::geo::distance::distance_meters;
use crate::registry::OfficeLocation;

/// The office a position fell inside, with the numbers that decided it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceMatch {
    pub office: String,
    pub distance_meters: f64,
    pub effective_radius_meters: f64,
}

/// Geofence radius widened by the reported GPS accuracy.
///
/// Negative or non-finite accuracy adds nothing; the allowance is capped at
/// `MAX_ACCURACY_ALLOWANCE_METERS`.
pub fn effective_radius(radius_meters: f64, accuracy_meters: f64) -> f64 {
    let allowance = if accuracy_meters.is_finite() {
        accuracy_meters.clamp(0.0, MAX_ACCURACY_ALLOWANCE_METERS)
    } else if accuracy_meters == f64::INFINITY {
        MAX_ACCURACY_ALLOWANCE_METERS
    } else {
        0.0
    };
    radius_meters + allowance
}

/// Returns the first office whose accuracy-adjusted geofence contains the point.
///
/// Offices without coordinates are skipped. Non-finite coordinates never match.
pub fn find_containing_office(
    latitude: f64,
    longitude: f64,
    accuracy_meters: f64,
    offices: &[OfficeLocation],
) -> Option<GeofenceMatch> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }

    offices.iter().find_map(|office| {
        let coords = office.coordinates()?;
        let distance = distance_meters(latitude, longitude, coords.latitude, coords.longitude);
        let radius = effective_radius(coords.radius_meters, accuracy_meters);
        log::trace!(
            "Office '{}': distance {:.1} m, effective radius {:.1} m",
            office.name(),
            distance,
            radius
        );
        (distance <= radius).then(|| GeofenceMatch {
            office: office.name().to_string(),
            distance_meters: distance,
            effective_radius_meters: radius,
        })
    })
}

/// Returns true when the point lies inside any office geofence.
pub fn is_within_any_office(
    latitude: f64,
    longitude: f64,
    accuracy_meters: f64,
    offices: &[OfficeLocation],
) -> bool {
    find_containing_office(latitude, longitude, accuracy_meters, offices).is_some()
}

/// Distance to the closest office with coordinates, for diagnostics.
pub fn nearest_office_distance(
    latitude: f64,
    longitude: f64,
    offices: &[OfficeLocation],
) -> Option<(String, f64)> {
    offices
        .iter()
        .filter_map(|office| {
            let coords = office.coordinates()?;
            let distance = distance_meters(latitude, longitude, coords.latitude, coords.longitude);
            Some((office.name().to_string(), distance))
        })
        .filter(|(_, distance)| distance.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
