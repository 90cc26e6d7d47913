//! Wind direction helpers.

/// The 16 compass points, clockwise from north.
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Nearest 16-point compass abbreviation for a bearing in degrees.
///
/// Bearings outside `[0, 360)` wrap; half sectors round away from zero, so
/// `22.5` is `NNE`. Non-finite input maps to `N`.
pub fn compass_point(degrees: f64) -> &'static str {
    let sector = (degrees / 22.5).round();
    if !sector.is_finite() {
        return COMPASS_POINTS[0];
    }
    COMPASS_POINTS[(sector as i64).rem_euclid(16) as usize]
}

/// Add `offset` to `angle` and normalize into `[0, 360)`.
pub fn rotate(angle: i64, offset: i64) -> i64 {
    angle.wrapping_add(offset).rem_euclid(360)
}
