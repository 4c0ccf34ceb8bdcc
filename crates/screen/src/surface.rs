/// Which 3D geometry currently presents the framebuffer.
///
/// Exactly one mode is active at a time; the controller owns the switch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SurfaceMode {
    #[default]
    Flat,
    Cylindrical,
    FlattenedCylindrical,
    TiledGrid,
}

/// Camera control scheme, fully determined by the surface mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanMode {
    /// Translate (flat) or follow the curve (flattened cylinder).
    PlanarPan,
    /// Yaw/pitch look from a fixed position.
    FreeRotate,
}

impl SurfaceMode {
    pub fn pan_mode(self) -> PanMode {
        match self {
            SurfaceMode::Flat | SurfaceMode::FlattenedCylindrical => PanMode::PlanarPan,
            SurfaceMode::Cylindrical | SurfaceMode::TiledGrid => PanMode::FreeRotate,
        }
    }

    /// Whether this mode renders the single cylindrical mesh.
    pub fn is_cylindrical(self) -> bool {
        matches!(self, SurfaceMode::Cylindrical | SurfaceMode::FlattenedCylindrical)
    }

    /// Stable label used by the settings store.
    pub fn label(self) -> &'static str {
        match self {
            SurfaceMode::Flat => "flat",
            SurfaceMode::Cylindrical => "curved",
            SurfaceMode::FlattenedCylindrical => "flattened-curved",
            SurfaceMode::TiledGrid => "tiled",
        }
    }

    /// Parse a persisted label; unknown labels fall back to `Flat`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "curved" => SurfaceMode::Cylindrical,
            "flattened-curved" => SurfaceMode::FlattenedCylindrical,
            "tiled" => SurfaceMode::TiledGrid,
            _ => SurfaceMode::Flat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PanMode, SurfaceMode};

    #[test]
    fn pan_mode_per_surface() {
        assert_eq!(SurfaceMode::Flat.pan_mode(), PanMode::PlanarPan);
        assert_eq!(SurfaceMode::FlattenedCylindrical.pan_mode(), PanMode::PlanarPan);
        assert_eq!(SurfaceMode::Cylindrical.pan_mode(), PanMode::FreeRotate);
        assert_eq!(SurfaceMode::TiledGrid.pan_mode(), PanMode::FreeRotate);
    }

    #[test]
    fn labels_round_trip() {
        for mode in [
            SurfaceMode::Flat,
            SurfaceMode::Cylindrical,
            SurfaceMode::FlattenedCylindrical,
            SurfaceMode::TiledGrid,
        ] {
            assert_eq!(SurfaceMode::from_label(mode.label()), mode);
        }
        assert_eq!(SurfaceMode::from_label("something-else"), SurfaceMode::Flat);
    }
}
