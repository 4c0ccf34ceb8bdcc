use foundation::math::Vec2;
use screen::SurfaceMode;
use session::LoopbackSession;
use settings::{FileStore, MemoryStore, SettingsStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use viewer::{Command, ScreenController};

/// Headless demo: drives the controller through a scripted session against a
/// loopback remote and logs what a renderer would consume each tick.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings_path =
        std::env::var("VIEWER_SETTINGS").unwrap_or_else(|_| "viewer-settings.json".to_owned());

    match FileStore::load(&settings_path) {
        Ok(store) => {
            let controller = run_demo(store);
            if let Err(err) = controller.store().flush() {
                warn!(%err, "failed to write settings");
            }
        }
        Err(err) => {
            warn!(%err, path = %settings_path, "settings unavailable, using in-memory store");
            run_demo(MemoryStore::new());
        }
    }
}

fn run_demo<P: SettingsStore>(store: P) -> ScreenController<LoopbackSession, P> {
    let mut session = LoopbackSession::new();
    session.connect(1920, 1080);

    let mut controller = ScreenController::new(session, store);
    controller.set_viewport_aspect(16.0 / 9.0);

    let script = [
        Command::SetMode(SurfaceMode::Cylindrical),
        Command::SetCurvature { percent: 60.0 },
        Command::Pan { dx: 250.0, dy: -80.0 },
        Command::Zoom { delta: -120.0 },
        Command::Pointer { ndc: Vec2::zero(), button_mask: 1 },
        Command::Pointer { ndc: Vec2::zero(), button_mask: 0 },
        Command::SetMode(SurfaceMode::TiledGrid),
        Command::SetTileGrid { rows: 2, cols: 3, padding: 0.05 },
    ];

    for command in script {
        info!(?command, "apply");
        controller.apply(command);

        let transform = controller.tick();
        info!(
            x = transform.position.x,
            y = transform.position.y,
            z = transform.position.z,
            fov_deg = transform.fov_y_rad.to_degrees(),
            "camera"
        );
        if controller.take_surface_rebuild() {
            info!(mode = controller.mode().label(), "surface rebuild requested");
        }
        for event in controller.drain_diagnostics() {
            info!(frame = event.frame_index, kind = event.kind, "{}", event.message);
        }
    }

    info!(
        mode = controller.mode().label(),
        tiles = controller.tile_grid().tiles.len(),
        pointers_sent = controller.session().sent_pointers.len(),
        status = controller.status(),
        "demo complete"
    );
    controller
}
