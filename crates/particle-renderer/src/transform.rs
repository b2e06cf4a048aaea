//! CPU reference of the vertex stage's pixel-to-clip mapping
//!
//! Test-only mirror of `points.vert.wgsl`; keep the two in sync.

use glam::Vec2;

/// Fixed on-screen point size in pixels
pub const POINT_SIZE: f32 = 3.0;

/// Fixed RGBA point color
pub const POINT_COLOR: [f32; 4] = [1.0, 1.0, 0.8, 0.7];

/// `((p / res) * 2 - 1) * (1, -1)`: pixel origin at the top-left, clip y up.
///
/// Rendering never calls this; `points.vert.wgsl` does the mapping on the
/// GPU. It is the CPU reference the mapping is tested against.
pub fn pixel_to_clip(position: Vec2, resolution: Vec2) -> Vec2 {
    ((position / resolution) * 2.0 - 1.0) * Vec2::new(1.0, -1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_corners_map_to_clip_corners() {
        assert_eq!(pixel_to_clip(Vec2::ZERO, RES), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_clip(RES, RES), Vec2::new(1.0, -1.0));
        assert_eq!(pixel_to_clip(Vec2::new(800.0, 0.0), RES), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_center_maps_to_origin() {
        assert_eq!(pixel_to_clip(RES * 0.5, RES), Vec2::ZERO);
    }

    #[test]
    fn test_y_is_flipped() {
        let upper = pixel_to_clip(Vec2::new(400.0, 100.0), RES);
        let lower = pixel_to_clip(Vec2::new(400.0, 500.0), RES);
        assert!(upper.y > lower.y);
    }
}
