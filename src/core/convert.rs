use glam::Vec2;

/// How many pixel units make up one simulation meter.
///
/// Scenes are authored in pixels while the solver works in meters; every
/// length and point crossing the boundary goes through one of the four
/// conversions below. Changing the ratio is a build-time configuration
/// concern, never a per-call parameter.
pub const PIXELS_PER_METER: f32 = 50.0;

/// Convert a pixel-space length to simulation meters.
#[inline]
pub fn to_sim(pixels: f32) -> f32 {
    pixels / PIXELS_PER_METER
}

/// Convert a simulation-meter length to pixels.
#[inline]
pub fn to_px(meters: f32) -> f32 {
    meters * PIXELS_PER_METER
}

/// Convert a pixel-space point to simulation space.
#[inline]
pub fn point_to_sim(p: Vec2) -> Vec2 {
    p / PIXELS_PER_METER
}

/// Convert a simulation-space point to pixel space.
#[inline]
pub fn point_to_px(p: Vec2) -> Vec2 {
    p * PIXELS_PER_METER
}
