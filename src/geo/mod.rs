//! Geographic signals: distance, office geofences and the device position source.

pub mod distance;
pub mod geofence;
mod provider;

pub use distance::{distance_meters, EARTH_RADIUS_METERS};
pub use geofence::{
    effective_radius, find_containing_office, is_within_any_office, nearest_office_distance,
    GeofenceMatch,
};
pub use provider::{
    DevicePosition, FixedPosition, GeolocationError, GeolocationProvider, NoGeolocation,
    PositionRequest,
};
