//! World-space screen geometry.
//!
//! Pure function over framebuffer dimensions, surface mode and curvature.
//! Every arithmetic failure path degrades to a documented constant; geometry
//! computation never fails.

use crate::framebuffer::FramebufferDescriptor;
use crate::surface::SurfaceMode;

/// Fixed world height of the projected screen; width follows the aspect.
pub const WORLD_SCREEN_HEIGHT: f64 = 2.0;

/// Viewing distance clamp (world units).
pub const MIN_SCREEN_DISTANCE: f64 = 0.1;
pub const MAX_SCREEN_DISTANCE: f64 = 50.0;

/// Flattened mode pushes the screen much further out; its effective distance
/// gets a 10x-larger ceiling.
pub const MAX_FLATTENED_DISTANCE: f64 = MAX_SCREEN_DISTANCE * 10.0;

/// Default viewing distance when everything else is invalid.
pub const DEFAULT_SCREEN_DISTANCE: f64 = 3.0;

/// Vertical camera field of view (degrees).
pub const BASE_CAMERA_FOV_DEG: f64 = 55.0;

/// Narrowest FOV the flattened mode lerps down to (degrees).
pub const MIN_FLATTEN_FOV_DEG: f64 = 5.0;

/// The screen should subtend this fraction of the vertical FOV.
pub const TARGET_ANGULAR_HEIGHT_RATIO: f64 = 0.7;

/// Curve radius sits slightly inside the effective distance.
pub const CURVE_RADIUS_FACTOR: f64 = 0.95;

/// Substitute curve angle when the computed one is degenerate.
pub const FALLBACK_CURVE_ANGLE: f64 = std::f64::consts::PI / 3.0;

/// Widest the cylinder is allowed to wrap.
pub const MAX_CURVE_ANGLE: f64 = std::f64::consts::PI * 1.5;

/// Minimum tessellation of the curved surface.
pub const MIN_RADIAL_SEGMENTS: u32 = 32;

/// Derived world geometry, recomputed in full whenever the framebuffer,
/// surface mode, curvature factor or base distance changes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenGeometry {
    pub world_width: f64,
    pub world_height: f64,
    /// Persisted/zoomed viewing distance, before curvature adjustments.
    pub base_distance: f64,
    /// Working distance after the flattened-mode FOV compensation.
    pub effective_distance: f64,
    /// Cylinder radius, `CURVE_RADIUS_FACTOR * effective_distance`.
    pub curve_radius: f64,
    /// Angular span of the cylindrical surface, in `(0, 1.5*pi]`.
    pub curve_angle: f64,
    /// Vertical FOV actually in use (radians).
    pub fov_y_rad: f64,
    /// Tessellation hint for the curved mesh rebuild.
    pub radial_segments: u32,
    /// True when the curve angle came from the degenerate-numeric fallback.
    pub curve_angle_is_fallback: bool,
}

/// Compute the full screen geometry.
///
/// - `curvature` is the flatten factor in `[0, 1]`; 1 keeps the base FOV,
///   0 flattens all the way down to `MIN_FLATTEN_FOV_DEG`. Ignored outside
///   `FlattenedCylindrical` mode.
/// - `stored_base_distance` is the user's persisted distance; it is preserved
///   (clamped) when finite and positive, recomputed otherwise.
pub fn compute_geometry(
    fb: FramebufferDescriptor,
    mode: SurfaceMode,
    curvature: f64,
    stored_base_distance: Option<f64>,
) -> ScreenGeometry {
    let fb = fb.sanitized();

    let world_height = WORLD_SCREEN_HEIGHT;
    let world_width = fb.aspect() * world_height;

    let base_fov = BASE_CAMERA_FOV_DEG.to_radians();
    let base_distance = match stored_base_distance {
        Some(d) if d.is_finite() && d > 0.0 => d.clamp(MIN_SCREEN_DISTANCE, MAX_SCREEN_DISTANCE),
        _ => solve_base_distance(world_height, base_fov),
    };

    let (fov_y_rad, effective_distance) = match mode {
        SurfaceMode::FlattenedCylindrical => {
            let t = curvature.clamp(0.0, 1.0);
            let t = if t.is_nan() { 1.0 } else { t };
            let fov = MIN_FLATTEN_FOV_DEG.to_radians()
                + (base_fov - MIN_FLATTEN_FOV_DEG.to_radians()) * t;

            let tan_base = (base_fov / 2.0).tan();
            let tan_cur = (fov / 2.0).tan();
            let eff = if tan_cur > 1e-4 && tan_base > 1e-4 {
                base_distance * (tan_base / tan_cur)
            } else {
                base_distance
            };
            (fov, eff.clamp(MIN_SCREEN_DISTANCE, MAX_FLATTENED_DISTANCE))
        }
        _ => (base_fov, base_distance),
    };

    let curve_radius = (effective_distance * CURVE_RADIUS_FACTOR).max(0.01);
    let raw_angle = world_width / (effective_distance * CURVE_RADIUS_FACTOR);
    let degenerate = raw_angle.is_nan()
        || raw_angle <= 0.001
        || effective_distance * CURVE_RADIUS_FACTOR <= 0.001;
    let (curve_angle, curve_angle_is_fallback) = if degenerate {
        (FALLBACK_CURVE_ANGLE, true)
    } else {
        (raw_angle.min(MAX_CURVE_ANGLE), false)
    };

    let radial_segments = (world_width * 10.0).floor().max(f64::from(MIN_RADIAL_SEGMENTS)) as u32;

    ScreenGeometry {
        world_width,
        world_height,
        base_distance,
        effective_distance,
        curve_radius,
        curve_angle,
        fov_y_rad,
        radial_segments,
        curve_angle_is_fallback,
    }
}

/// Distance at which the screen subtends `TARGET_ANGULAR_HEIGHT_RATIO` of the
/// vertical FOV.
fn solve_base_distance(world_height: f64, base_fov_rad: f64) -> f64 {
    let target_angular_height = base_fov_rad * TARGET_ANGULAR_HEIGHT_RATIO;
    let tan_half = (target_angular_height / 2.0).tan();
    let d = if tan_half > 1e-6 {
        (world_height / 2.0) / tan_half
    } else {
        DEFAULT_SCREEN_DISTANCE
    };
    let d = if d.is_nan() || d <= 0.0 {
        DEFAULT_SCREEN_DISTANCE
    } else {
        d
    };
    d.clamp(MIN_SCREEN_DISTANCE, MAX_SCREEN_DISTANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FramebufferDescriptor;
    use crate::surface::SurfaceMode;

    fn fb(w: u32, h: u32) -> FramebufferDescriptor {
        FramebufferDescriptor::new(w, h)
    }

    #[test]
    fn flat_800x600_world_size() {
        let g = compute_geometry(fb(800, 600), SurfaceMode::Flat, 1.0, None);
        assert_eq!(g.world_height, 2.0);
        assert!((g.world_width - 8.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn aspect_ratio_is_preserved() {
        for (w, h) in [(800, 600), (1920, 1080), (1024, 768), (3440, 1440), (640, 2000)] {
            for mode in [
                SurfaceMode::Flat,
                SurfaceMode::Cylindrical,
                SurfaceMode::FlattenedCylindrical,
            ] {
                let g = compute_geometry(fb(w, h), mode, 0.5, None);
                let want = f64::from(w) / f64::from(h);
                assert!(
                    (g.world_width / g.world_height - want).abs() < 1e-6,
                    "{w}x{h} {mode:?}"
                );
            }
        }
    }

    #[test]
    fn degenerate_framebuffer_uses_fallback() {
        let g = compute_geometry(fb(0, 0), SurfaceMode::Flat, 1.0, None);
        assert!((g.world_width / g.world_height - 800.0 / 600.0).abs() < 1e-9);
    }

    #[test]
    fn stored_distance_is_preserved() {
        let g = compute_geometry(fb(800, 600), SurfaceMode::Flat, 1.0, Some(7.5));
        assert_eq!(g.base_distance, 7.5);
        assert_eq!(g.effective_distance, 7.5);
    }

    #[test]
    fn invalid_stored_distance_is_recomputed() {
        for bad in [f64::NAN, 0.0, -3.0] {
            let g = compute_geometry(fb(800, 600), SurfaceMode::Flat, 1.0, Some(bad));
            assert!(g.base_distance.is_finite());
            assert!(g.base_distance > 0.0);
            // Solved from the 0.7 angular-height target, not the safety default.
            assert!((g.base_distance - 2.862).abs() < 0.01, "{}", g.base_distance);
        }
    }

    #[test]
    fn effective_distance_stays_in_mode_bounds() {
        for curvature in [0.0, 0.1, 0.25, 0.5, 0.75, 1.0] {
            for stored in [None, Some(0.05), Some(3.0), Some(500.0)] {
                let flat = compute_geometry(fb(800, 600), SurfaceMode::Cylindrical, curvature, stored);
                assert!(flat.effective_distance >= MIN_SCREEN_DISTANCE);
                assert!(flat.effective_distance <= MAX_SCREEN_DISTANCE);

                let flattened =
                    compute_geometry(fb(800, 600), SurfaceMode::FlattenedCylindrical, curvature, stored);
                assert!(flattened.effective_distance >= MIN_SCREEN_DISTANCE);
                assert!(flattened.effective_distance <= MAX_FLATTENED_DISTANCE);
            }
        }
    }

    #[test]
    fn flattened_zero_curvature_pushes_screen_out() {
        let base = compute_geometry(fb(800, 600), SurfaceMode::FlattenedCylindrical, 1.0, Some(3.0));
        let flat = compute_geometry(fb(800, 600), SurfaceMode::FlattenedCylindrical, 0.0, Some(3.0));
        // Full curvature keeps the base FOV, so distances match.
        assert!((base.effective_distance - 3.0).abs() < 1e-9);
        assert!(flat.effective_distance > base.effective_distance);
        assert!(flat.fov_y_rad < base.fov_y_rad);
    }

    #[test]
    fn curve_angle_capped_and_positive() {
        // Extremely wide framebuffer at the minimum distance would exceed the cap.
        let g = compute_geometry(fb(10_000, 100), SurfaceMode::Cylindrical, 1.0, Some(0.1));
        assert!(g.curve_angle <= MAX_CURVE_ANGLE + 1e-12);
        assert!(g.curve_angle > 0.0);
        assert!(!g.curve_angle_is_fallback);
    }

    #[test]
    fn radial_segments_scale_with_width() {
        let narrow = compute_geometry(fb(800, 600), SurfaceMode::Cylindrical, 1.0, None);
        assert_eq!(narrow.radial_segments, MIN_RADIAL_SEGMENTS);
        let wide = compute_geometry(fb(3840, 1080), SurfaceMode::Cylindrical, 1.0, None);
        assert!(wide.radial_segments > MIN_RADIAL_SEGMENTS);
    }
}
