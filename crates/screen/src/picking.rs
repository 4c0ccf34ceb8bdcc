//! Pointer picking: ray casting against the active surface and conversion of
//! hits into remote-framebuffer pixel coordinates.
//!
//! Everything here is a pure function of its inputs. A miss returns `None`
//! and the caller drops the input event; that is the normal no-intersection
//! path, not an error.

use foundation::math::{Quat, Vec2, Vec3, stable_total_cmp_f64};

use crate::camera::CameraTransform;
use crate::framebuffer::FramebufferDescriptor;
use crate::geometry::ScreenGeometry;
use crate::tiles::TileGrid;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    /// Ray through a normalized device coordinate, `ndc` in `[-1, 1]^2` with
    /// +y up, for a camera with the given viewport aspect ratio.
    pub fn from_ndc(ndc: Vec2, camera: &CameraTransform, aspect: f64) -> Option<Self> {
        let tan_half = (camera.fov_y_rad / 2.0).tan();
        if !tan_half.is_finite() || tan_half <= 0.0 {
            return None;
        }
        let dir_local = Vec3::new(ndc.x * tan_half * aspect, ndc.y * tan_half, -1.0);
        let dir = camera.orientation.rotate(dir_local).normalized()?;
        Some(Self::new(camera.position, dir))
    }
}

/// Which mesh set the pointer is resolved against.
#[derive(Debug, Copy, Clone)]
pub enum ActiveSurface<'a> {
    Flat(&'a ScreenGeometry),
    Cylindrical(&'a ScreenGeometry),
    Tiled(&'a TileGrid),
}

/// Grid address of a tile hit, carried so the pixel mapping can rescale the
/// tile-local UV into the full framebuffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TileAddress {
    pub row: u32,
    pub col: u32,
    pub rows: u32,
    pub cols: u32,
}

/// Result of one surface intersection, with local UV in `[0, 1]^2`
/// (`v` bottom-up).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceHit {
    pub distance: f64,
    pub u: f64,
    pub v: f64,
    pub tile: Option<TileAddress>,
}

/// Framebuffer pixel coordinate, clamped to `[0, dim-1]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PointerMapping {
    pub pixel_x: u32,
    pub pixel_y: u32,
}

const T_EPS: f64 = 1e-9;

/// Intersect a ray with the active surface. Returns the nearest hit.
///
/// For the tiled surface, equal distances tie-break on the lower
/// `(row, col)` so picking stays deterministic.
pub fn intersect_surface(ray: Ray, surface: ActiveSurface<'_>) -> Option<SurfaceHit> {
    match surface {
        ActiveSurface::Flat(geometry) => intersect_flat(ray, geometry),
        ActiveSurface::Cylindrical(geometry) => intersect_cylinder(ray, geometry),
        ActiveSurface::Tiled(grid) => intersect_tiles(ray, grid),
    }
}

/// Convert a surface hit into framebuffer pixels.
///
/// `v` is bottom-up by UV convention, hence the flip; tile hits rescale the
/// local UV into the tile's sub-rectangle of the framebuffer.
pub fn map_hit_to_pixel(hit: &SurfaceHit, fb: FramebufferDescriptor) -> PointerMapping {
    let fb = fb.sanitized();
    let fb_w = f64::from(fb.width);
    let fb_h = f64::from(fb.height);

    let (x, y) = match hit.tile {
        Some(tile) => (
            ((f64::from(tile.col) + hit.u) / f64::from(tile.cols) * fb_w).floor(),
            ((f64::from(tile.row) + (1.0 - hit.v)) / f64::from(tile.rows) * fb_h).floor(),
        ),
        None => ((hit.u * fb_w).floor(), ((1.0 - hit.v) * fb_h).floor()),
    };

    PointerMapping {
        pixel_x: (x.max(0.0) as u32).min(fb.width - 1),
        pixel_y: (y.max(0.0) as u32).min(fb.height - 1),
    }
}

/// Full pointer resolution: NDC -> ray -> surface hit -> pixel.
pub fn map_pointer_to_framebuffer(
    ndc: Vec2,
    camera: &CameraTransform,
    surface: ActiveSurface<'_>,
    viewport_aspect: f64,
    fb: FramebufferDescriptor,
) -> Option<PointerMapping> {
    let ray = Ray::from_ndc(ndc, camera, viewport_aspect)?;
    let hit = intersect_surface(ray, surface)?;
    Some(map_hit_to_pixel(&hit, fb))
}

fn intersect_flat(ray: Ray, geometry: &ScreenGeometry) -> Option<SurfaceHit> {
    let plane_z = -geometry.effective_distance;
    if ray.dir.z.abs() < 1e-12 {
        return None;
    }
    let t = (plane_z - ray.origin.z) / ray.dir.z;
    if t <= T_EPS {
        return None;
    }
    let p = ray.origin + ray.dir.scale(t);

    let u = p.x / geometry.world_width + 0.5;
    let v = p.y / geometry.world_height + 0.5;
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
        return None;
    }
    Some(SurfaceHit {
        distance: t,
        u,
        v,
        tile: None,
    })
}

fn intersect_cylinder(ray: Ray, geometry: &ScreenGeometry) -> Option<SurfaceHit> {
    let r = geometry.curve_radius;
    let half_angle = geometry.curve_angle / 2.0;
    let half_height = geometry.world_height / 2.0;
    // Vertical cylinder axis passes through (0, axis_z) in the XZ plane.
    let axis_z = -geometry.effective_distance + r;

    let ox = ray.origin.x;
    let oz = ray.origin.z - axis_z;
    let dx = ray.dir.x;
    let dz = ray.dir.z;

    let a = dx * dx + dz * dz;
    if a < 1e-18 {
        return None;
    }
    let b = 2.0 * (ox * dx + oz * dz);
    let c = ox * ox + oz * oz - r * r;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();

    // Nearest root first; the viewer sits on the concave side, so the first
    // root passing the angular/height window is the visible surface.
    for t in [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)] {
        if t <= T_EPS {
            continue;
        }
        let p = ray.origin + ray.dir.scale(t);
        // Surface point parameterization: x = r sin(theta),
        // z = axis_z - r cos(theta).
        let theta = p.x.atan2(axis_z - p.z);
        if theta.abs() > half_angle || p.y.abs() > half_height {
            continue;
        }
        let u = (theta + half_angle) / geometry.curve_angle;
        let v = (p.y + half_height) / geometry.world_height;
        return Some(SurfaceHit {
            distance: t,
            u,
            v,
            tile: None,
        });
    }
    None
}

fn intersect_tiles(ray: Ray, grid: &TileGrid) -> Option<SurfaceHit> {
    let half_w = grid.tile_world_size.x / 2.0;
    let half_h = grid.tile_world_size.y / 2.0;
    if half_w <= 0.0 || half_h <= 0.0 {
        return None;
    }

    let mut best: Option<(SurfaceHit, (u32, u32))> = None;
    for tile in &grid.tiles {
        let x_axis = tile.facing.rotate(Vec3::new(1.0, 0.0, 0.0));
        let y_axis = tile.facing.rotate(Vec3::new(0.0, 1.0, 0.0));
        let normal = tile.facing.rotate(Vec3::new(0.0, 0.0, 1.0));

        let denom = ray.dir.dot(normal);
        if denom.abs() < 1e-12 {
            continue;
        }
        let t = (tile.position - ray.origin).dot(normal) / denom;
        if t <= T_EPS {
            continue;
        }

        let local = ray.origin + ray.dir.scale(t) - tile.position;
        let a = local.dot(x_axis);
        let b = local.dot(y_axis);
        if a.abs() > half_w || b.abs() > half_h {
            continue;
        }

        let hit = SurfaceHit {
            distance: t,
            u: a / grid.tile_world_size.x + 0.5,
            v: b / grid.tile_world_size.y + 0.5,
            tile: Some(TileAddress {
                row: tile.row,
                col: tile.col,
                rows: grid.rows,
                cols: grid.cols,
            }),
        };

        let key = (tile.row, tile.col);
        best = match best {
            None => Some((hit, key)),
            Some((prev, prev_key)) => {
                let ord = stable_total_cmp_f64(hit.distance, prev.distance)
                    .then_with(|| key.cmp(&prev_key));
                if ord.is_lt() { Some((hit, key)) } else { Some((prev, prev_key)) }
            }
        };
    }
    best.map(|(hit, _)| hit)
}
