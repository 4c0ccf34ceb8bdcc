//! Screen controller: owns the surface mode, wires geometry, tiles, camera
//! and picking together, and reacts to remote-session lifecycle events.
//!
//! All mutation funnels through `apply` and `tick` on one thread; the render
//! tick is the single reader. Commands replace scattered input callbacks so
//! the single-writer property stays explicit and testable.

use runtime::{EventBus, Frame};
use screen::{
    ActiveSurface, CameraRig, CameraTransform, FALLBACK_FRAMEBUFFER, FramebufferDescriptor,
    ScreenGeometry, SurfaceMode, TileGrid, apply_zoom, compute_geometry, layout_tiles,
    map_pointer_to_framebuffer,
};
use session::{KeyEvent, PointerEvent, RemoteSession, SessionEvent, keysym};
use settings::{SettingsStore, ViewerSettings};

use foundation::math::Vec2;

/// The full interactive command set, applied synchronously between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Pan { dx: f64, dy: f64 },
    Zoom { delta: f64 },
    SetMode(SurfaceMode),
    Resize { width: u32, height: u32 },
    SetTileGrid { rows: u32, cols: u32, padding: f64 },
    SetCurvature { percent: f64 },
    SetSensorEnabled(bool),
    /// Device-orientation reading in degrees (alpha, beta, gamma).
    SensorReading { alpha_deg: f64, beta_deg: f64, gamma_deg: f64 },
    /// Pointer position in NDC plus the current button mask.
    Pointer { ndc: Vec2, button_mask: u8 },
    /// Raw key input; resolved to a keysym before forwarding.
    Key { code: String, key: String, down: bool },
}

pub struct ScreenController<S: RemoteSession, P: SettingsStore> {
    session: S,
    store: P,

    mode: SurfaceMode,
    framebuffer: FramebufferDescriptor,
    curvature_pct: f64,
    base_distance: f64,
    geometry: ScreenGeometry,

    tile_rows: u32,
    tile_cols: u32,
    tile_padding: f64,
    tile_grid: TileGrid,

    rig: CameraRig,
    viewport_aspect: f64,
    status: String,

    frame: Frame,
    events: EventBus,
    surface_dirty: bool,
    /// Transform produced by the last `tick`; picking resolves against this so
    /// clicks agree with what was actually rendered.
    last_transform: Option<CameraTransform>,
}

impl<S: RemoteSession, P: SettingsStore> ScreenController<S, P> {
    /// Build a controller from persisted settings and an (possibly not yet
    /// connected) session.
    pub fn new(session: S, store: P) -> Self {
        let loaded = ViewerSettings::load(&store);

        let mode = SurfaceMode::from_label(&loaded.screen_type);
        let framebuffer = session
            .framebuffer()
            .map(|fb| FramebufferDescriptor::new(fb.width, fb.height).sanitized())
            .unwrap_or(FALLBACK_FRAMEBUFFER);

        let geometry = compute_geometry(
            framebuffer,
            mode,
            loaded.curvature_pct / 100.0,
            Some(loaded.screen_distance),
        );

        // Restored pan state gets the same clamps interactive panning
        // enforces; a hand-edited store must not start outside them.
        let max_angle = geometry.curve_angle / 2.0;
        let max_height = geometry.world_height / 2.0;
        let mut rig = CameraRig::new();
        rig.set_surface_mode(mode);
        rig.planar_offset = Vec2::new(
            loaded.pan_offset_x,
            loaded.pan_offset_y.clamp(-max_height, max_height),
        );
        rig.cylindrical_pan.angle = loaded.cyl_pan_angle.clamp(-max_angle, max_angle);
        rig.cylindrical_pan.height = loaded.cyl_pan_height.clamp(-max_height, max_height);
        rig.manual_yaw = loaded.manual_yaw;
        rig.manual_pitch = loaded.manual_pitch;

        let mut controller = Self {
            session,
            store,
            mode,
            framebuffer,
            curvature_pct: loaded.curvature_pct,
            base_distance: geometry.base_distance,
            geometry,
            tile_rows: loaded.tile_rows,
            tile_cols: loaded.tile_cols,
            tile_padding: loaded.tile_padding,
            tile_grid: TileGrid {
                rows: 0,
                cols: 0,
                padding: 0.0,
                tile_world_size: Vec2::zero(),
                tiles: Vec::new(),
                skipped: Vec::new(),
                reject_reason: None,
            },
            rig,
            viewport_aspect: 16.0 / 9.0,
            status: "disconnected".to_owned(),
            frame: Frame::new(0, 1.0 / 60.0),
            events: EventBus::new(),
            surface_dirty: true,
            last_transform: None,
        };
        if controller.mode == SurfaceMode::TiledGrid {
            controller.rebuild_tiles();
        }
        controller
    }

    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    pub fn geometry(&self) -> &ScreenGeometry {
        &self.geometry
    }

    pub fn tile_grid(&self) -> &TileGrid {
        &self.tile_grid
    }

    pub fn framebuffer(&self) -> FramebufferDescriptor {
        self.framebuffer
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn set_viewport_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.viewport_aspect = aspect;
        }
    }

    /// True once since the last call if the renderer must rebuild surface
    /// meshes.
    pub fn take_surface_rebuild(&mut self) -> bool {
        std::mem::take(&mut self.surface_dirty)
    }

    /// Drain diagnostic events accumulated since the last call.
    pub fn drain_diagnostics(&mut self) -> Vec<runtime::Event> {
        self.events.drain()
    }

    /// Apply one interactive command, synchronously.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Pan { dx, dy } => {
                self.rig.pan(dx, dy, self.mode, &self.geometry);
                self.persist();
            }
            Command::Zoom { delta } => {
                self.base_distance = apply_zoom(self.base_distance, delta);
                self.recompute_geometry();
                self.persist();
            }
            Command::SetMode(mode) => {
                self.mode = mode;
                self.rig.set_surface_mode(mode);
                self.recompute_geometry();
                self.persist();
            }
            Command::Resize { width, height } => {
                self.resize_framebuffer(width, height);
            }
            Command::SetTileGrid { rows, cols, padding } => {
                self.tile_rows = rows.max(1);
                self.tile_cols = cols.max(1);
                self.tile_padding = if padding >= 0.0 { padding } else { 0.0 };
                if self.mode == SurfaceMode::TiledGrid {
                    self.rebuild_tiles();
                }
                self.persist();
            }
            Command::SetCurvature { percent } => {
                self.curvature_pct = percent.clamp(0.0, 100.0);
                self.recompute_geometry();
                self.persist();
            }
            Command::SetSensorEnabled(enabled) => {
                self.rig.set_sensor_enabled(enabled);
            }
            Command::SensorReading { alpha_deg, beta_deg, gamma_deg } => {
                // YXZ euler: pitch from beta, yaw from alpha, roll from -gamma.
                self.rig.set_sensor_euler(
                    beta_deg.to_radians(),
                    alpha_deg.to_radians(),
                    -gamma_deg.to_radians(),
                );
            }
            Command::Pointer { ndc, button_mask } => {
                self.forward_pointer(ndc, button_mask);
            }
            Command::Key { code, key, down } => {
                self.forward_key(&code, &key, down);
            }
        }
    }

    /// One render tick: drain session lifecycle events, then produce the
    /// smoothed camera transform.
    pub fn tick(&mut self) -> CameraTransform {
        for event in self.session.drain_events() {
            self.handle_session_event(event);
        }
        let transform = self.rig.tick(self.mode, &self.geometry);
        self.last_transform = Some(transform);
        self.frame = self.frame.next();
        transform
    }

    fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected => {
                self.status = "connected".to_owned();
                self.events.emit(self.frame, "session", "connected");
                if let Some(fb) = self.session.framebuffer() {
                    self.resize_framebuffer(fb.width, fb.height);
                }
            }
            SessionEvent::FramebufferResized { width, height } => {
                self.resize_framebuffer(width, height);
            }
            SessionEvent::Disconnected { clean } => {
                // Geometry and camera state survive a disconnect.
                self.status = if clean {
                    "disconnected (cleanly)".to_owned()
                } else {
                    "disconnected (unexpectedly)".to_owned()
                };
                self.events.emit(self.frame, "session", self.status.clone());
            }
            SessionEvent::CredentialsRequired => {
                self.status = "credentials required".to_owned();
                self.events.emit(self.frame, "session", "credentials required");
            }
            SessionEvent::DesktopName { name } => {
                self.status = format!("connected ({name})");
            }
        }
    }

    fn resize_framebuffer(&mut self, width: u32, height: u32) {
        let descriptor = FramebufferDescriptor::new(width, height);
        if descriptor.sanitized() != descriptor {
            self.events.emit(
                self.frame,
                "geometry",
                format!("invalid framebuffer {width}x{height}, using fallback"),
            );
        }
        self.framebuffer = descriptor.sanitized();
        self.recompute_geometry();
    }

    fn recompute_geometry(&mut self) {
        self.geometry = compute_geometry(
            self.framebuffer,
            self.mode,
            self.curvature_pct / 100.0,
            Some(self.base_distance),
        );
        self.base_distance = self.geometry.base_distance;
        if self.geometry.curve_angle_is_fallback {
            self.events
                .emit(self.frame, "geometry", "degenerate curve angle, using fallback");
        }
        if self.mode == SurfaceMode::TiledGrid {
            self.rebuild_tiles();
        }
        self.surface_dirty = true;
    }

    fn rebuild_tiles(&mut self) {
        self.tile_grid = layout_tiles(
            &self.geometry,
            self.tile_rows,
            self.tile_cols,
            self.tile_padding,
        );
        if let Some(reason) = self.tile_grid.reject_reason {
            self.events
                .emit(self.frame, "tiles", format!("layout rejected: {reason}"));
        }
        for (row, col) in &self.tile_grid.skipped {
            self.events.emit(
                self.frame,
                "tiles",
                format!("tile ({row},{col}) position is non-finite, skipped"),
            );
        }
        self.surface_dirty = true;
    }

    fn active_surface(&self) -> ActiveSurface<'_> {
        match self.mode {
            SurfaceMode::Flat => ActiveSurface::Flat(&self.geometry),
            SurfaceMode::Cylindrical | SurfaceMode::FlattenedCylindrical => {
                ActiveSurface::Cylindrical(&self.geometry)
            }
            SurfaceMode::TiledGrid => ActiveSurface::Tiled(&self.tile_grid),
        }
    }

    fn forward_pointer(&mut self, ndc: Vec2, button_mask: u8) {
        // Nothing has been rendered before the first tick, so there is
        // nothing meaningful to click on yet.
        let Some(transform) = self.last_transform else {
            return;
        };
        let Some(mapped) = map_pointer_to_framebuffer(
            ndc,
            &transform,
            self.active_surface(),
            self.viewport_aspect,
            self.framebuffer,
        ) else {
            // Ray missed every surface; the event is dropped, not an error.
            return;
        };
        self.session.send_pointer(PointerEvent {
            x: mapped.pixel_x,
            y: mapped.pixel_y,
            button_mask,
        });
    }

    fn forward_key(&mut self, code: &str, key: &str, down: bool) {
        match keysym::keysym_for_key(code, key) {
            Some(symbol) => self.session.send_key(KeyEvent {
                symbol,
                code: code.to_owned(),
                down,
            }),
            None if down => {
                self.events
                    .emit(self.frame, "input", format!("unmapped key code {code:?}"));
            }
            None => {}
        }
    }

    fn persist(&mut self) {
        let snapshot = ViewerSettings {
            screen_type: self.mode.label().to_owned(),
            curvature_pct: self.curvature_pct,
            screen_distance: self.base_distance,
            pan_offset_x: self.rig.planar_offset.x,
            pan_offset_y: self.rig.planar_offset.y,
            cyl_pan_angle: self.rig.cylindrical_pan.angle,
            cyl_pan_height: self.rig.cylindrical_pan.height,
            manual_yaw: self.rig.manual_yaw,
            manual_pitch: self.rig.manual_pitch,
            tile_rows: self.tile_rows,
            tile_cols: self.tile_cols,
            tile_padding: self.tile_padding,
        };
        snapshot.save(&mut self.store);
    }
}
