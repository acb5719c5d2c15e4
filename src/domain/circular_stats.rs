// Arithmetic and angular averaging primitives

const FULL_TURN_DEG: f64 = 360.0;

/// Arithmetic mean. Callers guarantee a non-empty slice.
pub fn linear_mean(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty(), "linear_mean of an empty bucket");
    values.iter().sum::<f64>() / values.len() as f64
}

/// Vector mean of angles in degrees, normalized to `[0, 360)`.
///
/// Each angle becomes a unit vector; the mean direction is the angle of the
/// summed vector, so 350° and 10° average to 0° rather than 180°.
/// Callers guarantee a non-empty slice.
pub fn circular_mean(angles_deg: &[f64]) -> f64 {
    debug_assert!(!angles_deg.is_empty(), "circular_mean of an empty bucket");
    let (sum_sin, sum_cos) = angles_deg
        .iter()
        .map(|deg| deg.to_radians())
        .fold((0.0_f64, 0.0_f64), |(s, c), rad| (s + rad.sin(), c + rad.cos()));

    normalize_degrees(sum_sin.atan2(sum_cos).to_degrees())
}

/// Map any finite angle into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(FULL_TURN_DEG);
    // rem_euclid of a tiny negative number rounds up to exactly 360
    if wrapped >= FULL_TURN_DEG { 0.0 } else { wrapped }
}
