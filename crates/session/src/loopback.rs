//! In-memory remote session used by tests and the headless demo.

use std::collections::VecDeque;

use crate::events::{
    FramebufferSize, KeyEvent, PixelSourceHandle, PointerEvent, RemoteSession, SessionEvent,
};

/// A session double that records outbound input and replays queued lifecycle
/// events on demand.
#[derive(Debug, Default)]
pub struct LoopbackSession {
    framebuffer: Option<FramebufferSize>,
    pixel_source: Option<PixelSourceHandle>,
    pending: VecDeque<SessionEvent>,
    pub sent_pointers: Vec<PointerEvent>,
    pub sent_keys: Vec<KeyEvent>,
}

impl LoopbackSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a connect notification with the given framebuffer size.
    pub fn connect(&mut self, width: u32, height: u32) {
        self.framebuffer = Some(FramebufferSize::new(width, height));
        self.pixel_source = Some(PixelSourceHandle(1));
        self.pending.push_back(SessionEvent::Connected);
    }

    /// Queue a server-side resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.framebuffer = Some(FramebufferSize::new(width, height));
        self.pending.push_back(SessionEvent::FramebufferResized { width, height });
    }

    pub fn disconnect(&mut self, clean: bool) {
        self.framebuffer = None;
        self.pixel_source = None;
        self.pending.push_back(SessionEvent::Disconnected { clean });
    }

    pub fn push_event(&mut self, event: SessionEvent) {
        self.pending.push_back(event);
    }
}

impl RemoteSession for LoopbackSession {
    fn framebuffer(&self) -> Option<FramebufferSize> {
        self.framebuffer
    }

    fn pixel_source(&self) -> Option<PixelSourceHandle> {
        self.pixel_source
    }

    fn send_pointer(&mut self, event: PointerEvent) {
        self.sent_pointers.push(event);
    }

    fn send_key(&mut self, event: KeyEvent) {
        self.sent_keys.push(event);
    }

    fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::LoopbackSession;
    use crate::events::{PointerEvent, RemoteSession, SessionEvent};

    #[test]
    fn lifecycle_events_arrive_in_order() {
        let mut session = LoopbackSession::new();
        session.connect(800, 600);
        session.resize(1920, 1080);
        session.disconnect(true);

        let events = session.drain_events();
        assert_eq!(
            events,
            vec![
                SessionEvent::Connected,
                SessionEvent::FramebufferResized { width: 1920, height: 1080 },
                SessionEvent::Disconnected { clean: true },
            ]
        );
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn records_outbound_input_in_order() {
        let mut session = LoopbackSession::new();
        session.connect(800, 600);
        session.send_pointer(PointerEvent { x: 1, y: 2, button_mask: 1 });
        session.send_pointer(PointerEvent { x: 3, y: 4, button_mask: 0 });
        assert_eq!(session.sent_pointers.len(), 2);
        assert_eq!(session.sent_pointers[0].x, 1);
        assert_eq!(session.sent_pointers[1].button_mask, 0);
    }
}
