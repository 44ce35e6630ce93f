use crate::models::GeoPoint;

/// Earth's radius in statute miles
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `from` - First point, degrees
/// * `to` - Second point, degrees
#[inline]
pub fn haversine_miles(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Proximity score (0-100) for a transport distance
///
/// Shorter distance means shorter cold ischemia time. Banded:
/// <=50mi 100, <=150mi 80, <=500mi 60, <=1000mi 40, beyond 20.
#[inline]
pub fn distance_score(distance_miles: f64) -> f64 {
    if distance_miles <= 50.0 {
        100.0
    } else if distance_miles <= 150.0 {
        80.0
    } else if distance_miles <= 500.0 {
        60.0
    } else if distance_miles <= 1000.0 {
        40.0
    } else {
        20.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_miles() {
        // Chicago to St. Louis is roughly 260 miles
        let chicago = GeoPoint::new(41.8781, -87.6298);
        let st_louis = GeoPoint::new(38.6270, -90.1994);

        let distance = haversine_miles(chicago, st_louis);
        assert!((distance - 260.0).abs() < 10.0, "Distance should be ~260mi, got {}", distance);
    }

    #[test]
    fn test_haversine_same_point() {
        let p = GeoPoint::new(40.7128, -74.0060);
        assert!(haversine_miles(p, p) < 0.01);
    }

    #[test]
    fn test_distance_bands() {
        assert_eq!(distance_score(0.0), 100.0);
        assert_eq!(distance_score(50.0), 100.0);
        assert_eq!(distance_score(120.0), 80.0);
        assert_eq!(distance_score(400.0), 60.0);
        assert_eq!(distance_score(999.0), 40.0);
        assert_eq!(distance_score(2500.0), 20.0);
    }

    #[test]
    fn test_distance_score_monotonic() {
        let mut previous = distance_score(0.0);
        for miles in (0..3000).step_by(25) {
            let score = distance_score(miles as f64);
            assert!(score <= previous);
            previous = score;
        }
    }
}
