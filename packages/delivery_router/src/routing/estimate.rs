//! Converts a route distance into an estimated travel time

/// Estimate how many whole minutes it takes to cover `distance` km at
/// `average_speed` km/h. Partial minutes are always rounded up, so the
/// estimate never understates the travel time.
///
/// No estimate is produced for an infinite (unreachable), negative or NaN
/// distance, or for a speed which is not a positive, finite number.
pub fn estimate_travel_time(distance: f64, average_speed: f64) -> Option<u64> {
    if !distance.is_finite() || distance < 0.0 {
        return None;
    }
    if !average_speed.is_finite() || average_speed <= 0.0 {
        return None;
    }

    // Multiplying first keeps exact inputs such as 5km at 25km/h from picking
    // up rounding error, which ceil would otherwise turn into an extra minute
    let minutes = (distance * 60.0 / average_speed).ceil();

    Some(minutes as u64)
}
