//! Screen projection core: geometry, tile layout, camera rig and pointer
//! picking for presenting a remote framebuffer on a 3D surface.

pub mod camera;
pub mod framebuffer;
pub mod geometry;
pub mod picking;
pub mod surface;
pub mod tiles;

pub use camera::*;
pub use framebuffer::*;
pub use geometry::*;
pub use picking::*;
pub use surface::*;
pub use tiles::*;
