//! Camera rig: per-mode orientation/pan state and the per-frame transform.
//!
//! The rig owns all orientation state. Input handlers mutate it between
//! ticks; `tick` reads it exactly once per rendered frame and smooths the
//! orientation toward the freshly computed target.

use foundation::math::{Quat, Vec2, Vec3};

use crate::geometry::{MAX_SCREEN_DISTANCE, MIN_SCREEN_DISTANCE, ScreenGeometry};
use crate::surface::{PanMode, SurfaceMode};

pub const PAN_SENSITIVITY_XY_LINEAR: f64 = 0.001;
pub const PAN_SENSITIVITY_XY_ANGULAR: f64 = 0.001;
pub const PAN_SENSITIVITY_ROTATE: f64 = 0.0025;
pub const ZOOM_SENSITIVITY: f64 = 0.1;

/// Fraction of the remaining distance the smoothed orientation covers each
/// frame. Damps jitter from discrete pointer/sensor deltas.
pub const ORIENTATION_BLEND: f64 = 0.6;

/// Pan state over the cylindrical surface: angle along the arc plus height
/// along the cylinder axis.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CylindricalPan {
    pub angle: f64,
    pub height: f64,
}

/// The camera pose consumed by rendering and pointer picking.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraTransform {
    pub position: Vec3,
    pub orientation: Quat,
    pub fov_y_rad: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub manual_yaw: f64,
    pub manual_pitch: f64,
    pub planar_offset: Vec2,
    pub cylindrical_pan: CylindricalPan,
    sensor_enabled: bool,
    /// Last sensor reading as YXZ euler (pitch, yaw, roll), radians.
    sensor_euler: (f64, f64, f64),
    pan_mode: PanMode,
    /// Smoothed orientation from the previous tick; `None` until the first
    /// tick, which snaps.
    smoothed: Option<Quat>,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            manual_yaw: 0.0,
            manual_pitch: 0.0,
            planar_offset: Vec2::zero(),
            cylindrical_pan: CylindricalPan::default(),
            sensor_enabled: false,
            sensor_euler: (0.0, 0.0, 0.0),
            pan_mode: PanMode::PlanarPan,
            smoothed: None,
        }
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pan_mode(&self) -> PanMode {
        self.pan_mode
    }

    /// Pan-mode transitions happen only on an explicit surface-mode switch.
    pub fn set_surface_mode(&mut self, mode: SurfaceMode) {
        self.pan_mode = mode.pan_mode();
    }

    pub fn set_sensor_enabled(&mut self, enabled: bool) {
        self.sensor_enabled = enabled;
    }

    /// Record a device-orientation reading (YXZ euler, radians).
    pub fn set_sensor_euler(&mut self, pitch: f64, yaw: f64, roll: f64) {
        self.sensor_euler = (pitch, yaw, roll);
    }

    /// Apply a pointer pan delta for the active surface mode.
    ///
    /// Clamps: manual pitch within +-pi/2, cylindrical angle within half the
    /// curve angle, heights within half the world height.
    pub fn pan(&mut self, dx: f64, dy: f64, mode: SurfaceMode, geometry: &ScreenGeometry) {
        match (self.pan_mode, mode) {
            (PanMode::PlanarPan, SurfaceMode::Flat) => {
                let factor = geometry.effective_distance * PAN_SENSITIVITY_XY_LINEAR;
                self.planar_offset.x -= dx * factor;
                self.planar_offset.y += dy * factor;
                let max_height = geometry.world_height / 2.0;
                self.planar_offset.y = self.planar_offset.y.clamp(-max_height, max_height);
            }
            (PanMode::PlanarPan, _) => {
                if geometry.curve_radius > 0.01 {
                    self.cylindrical_pan.angle -= dx * PAN_SENSITIVITY_XY_ANGULAR
                        * geometry.effective_distance
                        / geometry.curve_radius;
                    self.cylindrical_pan.height +=
                        dy * PAN_SENSITIVITY_XY_LINEAR * geometry.effective_distance;

                    let max_angle = geometry.curve_angle / 2.0;
                    self.cylindrical_pan.angle =
                        self.cylindrical_pan.angle.clamp(-max_angle, max_angle);
                    let max_height = geometry.world_height / 2.0;
                    self.cylindrical_pan.height =
                        self.cylindrical_pan.height.clamp(-max_height, max_height);
                }
            }
            (PanMode::FreeRotate, _) => {
                self.manual_yaw -= dx * PAN_SENSITIVITY_ROTATE;
                self.manual_pitch -= dy * PAN_SENSITIVITY_ROTATE;
                self.manual_pitch = self
                    .manual_pitch
                    .clamp(-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2);
            }
        }
    }

    /// Base pose before sensor fusion and smoothing.
    pub fn base_pose(&self, mode: SurfaceMode, geometry: &ScreenGeometry) -> (Vec3, Quat) {
        match (self.pan_mode, mode) {
            (PanMode::PlanarPan, SurfaceMode::Flat) => {
                // Pure translation: the view shifts with the offset and keeps
                // looking straight ahead.
                let position = Vec3::new(self.planar_offset.x, self.planar_offset.y, 0.0);
                (position, Quat::identity())
            }
            (PanMode::PlanarPan, _) => {
                // Look around the curve: stand on a circle of radius
                // `effective_distance` around the panned surface point and
                // face it.
                let r = geometry.curve_radius;
                let angle = self.cylindrical_pan.angle;
                let axis_z = -geometry.effective_distance + r;

                let surface_point = Vec3::new(
                    r * angle.sin(),
                    self.cylindrical_pan.height,
                    axis_z - r * angle.cos(),
                );
                let normal_towards_camera = Vec3::new(-angle.sin(), 0.0, angle.cos());
                let position =
                    surface_point + normal_towards_camera.scale(geometry.effective_distance);
                let orientation =
                    Quat::look_rotation(surface_point - position, Vec3::new(0.0, 1.0, 0.0));
                (position, orientation)
            }
            (PanMode::FreeRotate, _) => (
                Vec3::zero(),
                Quat::from_yaw_pitch(self.manual_yaw, self.manual_pitch),
            ),
        }
    }

    /// Target orientation after sensor fusion.
    fn target_pose(&self, mode: SurfaceMode, geometry: &ScreenGeometry) -> (Vec3, Quat) {
        let (position, base) = self.base_pose(mode, geometry);
        let (pitch, yaw, roll) = self.sensor_euler;
        if self.sensor_enabled && (pitch != 0.0 || yaw != 0.0 || roll != 0.0) {
            let sensor = Quat::from_euler_yxz(pitch, yaw, roll);
            (position, sensor.mul(base))
        } else {
            (position, base)
        }
    }

    /// Advance the smoothed orientation one frame and produce the transform.
    ///
    /// The first tick snaps to the target; subsequent ticks slerp by
    /// `ORIENTATION_BLEND`.
    pub fn tick(&mut self, mode: SurfaceMode, geometry: &ScreenGeometry) -> CameraTransform {
        let (position, target) = self.target_pose(mode, geometry);
        let orientation = match self.smoothed {
            None => target,
            Some(prev) => prev.slerp(target, ORIENTATION_BLEND),
        };
        self.smoothed = Some(orientation);

        CameraTransform {
            position,
            orientation,
            fov_y_rad: geometry.fov_y_rad,
        }
    }
}

/// Apply a wheel delta to the base distance (`distance /= factor`), clamped.
///
/// This feeds a geometry recompute; the rig itself does not hold distance.
pub fn apply_zoom(base_distance: f64, wheel_delta: f64) -> f64 {
    let factor = 1.0 - wheel_delta * ZOOM_SENSITIVITY * 0.01;
    let zoomed = base_distance / factor;
    if zoomed.is_nan() {
        base_distance.clamp(MIN_SCREEN_DISTANCE, MAX_SCREEN_DISTANCE)
    } else {
        zoomed.clamp(MIN_SCREEN_DISTANCE, MAX_SCREEN_DISTANCE)
    }
}
