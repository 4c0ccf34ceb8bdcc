use crate::frame::Frame;

/// Minimal diagnostic event type.
///
/// Core crates report recoverable anomalies (geometry fallbacks, skipped
/// tiles, session lifecycle) here instead of pulling in a logging dependency;
/// the app layer drains the bus and forwards to its own logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
