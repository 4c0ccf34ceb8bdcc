//! Remote-session interface types.
//!
//! This is the narrow seam between the projection core and whatever protocol
//! client drives the remote desktop: the current framebuffer descriptor, a
//! pixel-source handle, input transport, and an ordered lifecycle stream.
//! The wire types are serde-serializable so a transport can ship them as-is.

use serde::{Deserialize, Serialize};

/// Remote framebuffer dimensions as reported by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramebufferSize {
    pub width: u32,
    pub height: u32,
}

impl FramebufferSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Opaque handle to the live pixel source (texture, canvas, shared buffer).
///
/// The core never reads pixels; it only forwards the handle to the renderer
/// when the surface is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSourceHandle(pub u64);

/// Pointer event in framebuffer pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: u32,
    pub y: u32,
    pub button_mask: u8,
}

/// Key event carrying the resolved keysym plus the physical code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub symbol: u32,
    pub code: String,
    pub down: bool,
}

/// Ordered, discrete lifecycle notifications from the remote session.
///
/// These are never interleaved with a geometry rebuild in progress; the
/// controller drains them at the start of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Connected,
    FramebufferResized { width: u32, height: u32 },
    Disconnected { clean: bool },
    CredentialsRequired,
    DesktopName { name: String },
}

/// The remote-desktop collaborator as seen by the projection core.
pub trait RemoteSession {
    /// Current framebuffer descriptor, if connected.
    fn framebuffer(&self) -> Option<FramebufferSize>;

    /// Current pixel-source handle, if connected.
    fn pixel_source(&self) -> Option<PixelSourceHandle>;

    fn send_pointer(&mut self, event: PointerEvent);

    fn send_key(&mut self, event: KeyEvent);

    /// Drain pending lifecycle notifications, in arrival order.
    fn drain_events(&mut self) -> Vec<SessionEvent>;
}

#[cfg(test)]
mod tests {
    use super::{PointerEvent, SessionEvent};

    #[test]
    fn wire_types_round_trip_through_json() {
        let ev = SessionEvent::FramebufferResized { width: 1920, height: 1080 };
        let json = serde_json::to_string(&ev).unwrap();
        assert_eq!(serde_json::from_str::<SessionEvent>(&json).unwrap(), ev);

        let ptr = PointerEvent { x: 10, y: 20, button_mask: 1 };
        let json = serde_json::to_string(&ptr).unwrap();
        assert_eq!(serde_json::from_str::<PointerEvent>(&json).unwrap(), ptr);
    }
}
