//! Typed viewer settings over the flat key-value store.

use crate::store::SettingsStore;

pub const KEY_SCREEN_TYPE: &str = "screen_type";
pub const KEY_CURVATURE: &str = "curvature";
pub const KEY_SCREEN_DISTANCE: &str = "screen_distance";
pub const KEY_PAN_OFFSET_X: &str = "pan_offset_x";
pub const KEY_PAN_OFFSET_Y: &str = "pan_offset_y";
pub const KEY_CYL_PAN_ANGLE: &str = "cyl_pan_angle";
pub const KEY_CYL_PAN_HEIGHT: &str = "cyl_pan_height";
pub const KEY_MANUAL_YAW: &str = "manual_yaw";
pub const KEY_MANUAL_PITCH: &str = "manual_pitch";
pub const KEY_TILE_ROWS: &str = "tile_rows";
pub const KEY_TILE_COLS: &str = "tile_cols";
pub const KEY_TILE_PADDING: &str = "tile_padding";

/// All persisted viewer scalars, loaded at startup and written back on every
/// interactive change.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    /// Surface-mode label (`flat`, `curved`, `flattened-curved`, `tiled`).
    pub screen_type: String,
    /// Curvature percentage in `[0, 100]`.
    pub curvature_pct: f64,
    pub screen_distance: f64,
    pub pan_offset_x: f64,
    pub pan_offset_y: f64,
    pub cyl_pan_angle: f64,
    pub cyl_pan_height: f64,
    pub manual_yaw: f64,
    pub manual_pitch: f64,
    pub tile_rows: u32,
    pub tile_cols: u32,
    pub tile_padding: f64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            screen_type: "flat".to_owned(),
            curvature_pct: 100.0,
            screen_distance: 3.0,
            pan_offset_x: 0.0,
            pan_offset_y: 0.0,
            cyl_pan_angle: 0.0,
            cyl_pan_height: 0.0,
            manual_yaw: 0.0,
            manual_pitch: 0.0,
            tile_rows: 2,
            tile_cols: 2,
            tile_padding: 0.05,
        }
    }
}

impl ViewerSettings {
    /// Load from a store; missing or unparseable values get their defaults,
    /// and out-of-range values are repaired rather than rejected.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();

        let f = |key: &str, default: f64| -> f64 {
            store
                .get(key)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(default)
        };
        let u = |key: &str, default: u32| -> u32 {
            store
                .get(key)
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|v| *v >= 1)
                .unwrap_or(default)
        };

        let screen_distance = {
            let d = f(KEY_SCREEN_DISTANCE, defaults.screen_distance);
            if d > 0.0 { d } else { defaults.screen_distance }
        };
        let tile_padding = {
            let p = f(KEY_TILE_PADDING, defaults.tile_padding);
            if p >= 0.0 { p } else { defaults.tile_padding }
        };

        Self {
            screen_type: store
                .get(KEY_SCREEN_TYPE)
                .unwrap_or_else(|| defaults.screen_type.clone()),
            curvature_pct: f(KEY_CURVATURE, defaults.curvature_pct).clamp(0.0, 100.0),
            screen_distance,
            pan_offset_x: f(KEY_PAN_OFFSET_X, 0.0),
            pan_offset_y: f(KEY_PAN_OFFSET_Y, 0.0),
            cyl_pan_angle: f(KEY_CYL_PAN_ANGLE, 0.0),
            cyl_pan_height: f(KEY_CYL_PAN_HEIGHT, 0.0),
            manual_yaw: f(KEY_MANUAL_YAW, 0.0),
            manual_pitch: f(KEY_MANUAL_PITCH, 0.0)
                .clamp(-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2),
            tile_rows: u(KEY_TILE_ROWS, defaults.tile_rows),
            tile_cols: u(KEY_TILE_COLS, defaults.tile_cols),
            tile_padding,
        }
    }

    pub fn save(&self, store: &mut dyn SettingsStore) {
        store.set(KEY_SCREEN_TYPE, &self.screen_type);
        store.set(KEY_CURVATURE, &self.curvature_pct.to_string());
        store.set(KEY_SCREEN_DISTANCE, &self.screen_distance.to_string());
        store.set(KEY_PAN_OFFSET_X, &self.pan_offset_x.to_string());
        store.set(KEY_PAN_OFFSET_Y, &self.pan_offset_y.to_string());
        store.set(KEY_CYL_PAN_ANGLE, &self.cyl_pan_angle.to_string());
        store.set(KEY_CYL_PAN_HEIGHT, &self.cyl_pan_height.to_string());
        store.set(KEY_MANUAL_YAW, &self.manual_yaw.to_string());
        store.set(KEY_MANUAL_PITCH, &self.manual_pitch.to_string());
        store.set(KEY_TILE_ROWS, &self.tile_rows.to_string());
        store.set(KEY_TILE_COLS, &self.tile_cols.to_string());
        store.set(KEY_TILE_PADDING, &self.tile_padding.to_string());
    }
}
