//! Pipeline observer that publishes on the service event bus

use crate::media::pipeline::log_event;
use crate::media::PipelineObserver;
use tunescope_common::{EventBus, TuneScopeEvent};

/// Logs each pipeline event and forwards it to SSE subscribers
#[derive(Debug, Clone)]
pub struct EventBusObserver {
    event_bus: EventBus,
}

impl EventBusObserver {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

impl PipelineObserver for EventBusObserver {
    fn notify(&self, event: TuneScopeEvent) {
        log_event(&event);
        self.event_bus.emit_lossy(event);
    }
}
