// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured in-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event as a
//! [`RecordedEvent`] in arrival order, for later inspection or export via
//! [`chrome`](crate::chrome).

use scanout_core::trace::{
    EnqueueEvent, FlushEvent, MetadataDeliveryEvent, PauseEvent, ResumeEvent, TickEvent,
    TraceSink,
};

/// One recorded presentation-schedule event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A node was committed to a ring.
    Enqueue(EnqueueEvent),
    /// One tick of the schedule ran.
    Tick(TickEvent),
    /// A plane was paused.
    Pause(PauseEvent),
    /// A plane resumed.
    Resume(ResumeEvent),
    /// A queue was flushed.
    Flush(FlushEvent),
    /// A metadata item was delivered.
    MetadataDelivery(MetadataDeliveryEvent),
}

/// A [`TraceSink`] that records events in arrival order.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recording, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recording.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl TraceSink for RecorderSink {
    fn on_enqueue(&mut self, e: &EnqueueEvent) {
        self.events.push(RecordedEvent::Enqueue(*e));
    }

    fn on_tick(&mut self, e: &TickEvent) {
        self.events.push(RecordedEvent::Tick(*e));
    }

    fn on_pause(&mut self, e: &PauseEvent) {
        self.events.push(RecordedEvent::Pause(*e));
    }

    fn on_resume(&mut self, e: &ResumeEvent) {
        self.events.push(RecordedEvent::Resume(*e));
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        self.events.push(RecordedEvent::Flush(*e));
    }

    fn on_metadata_delivery(&mut self, e: &MetadataDeliveryEvent) {
        self.events.push(RecordedEvent::MetadataDelivery(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanout_core::frame_queue::AdvanceReport;
    use scanout_core::registry::PlaneId;
    use scanout_core::time::TickTime;
    use scanout_core::trace::Tracer;

    #[test]
    fn records_events_in_arrival_order() {
        let mut recorder = RecorderSink::new();
        let mut tracer = Tracer::new(&mut recorder);

        tracer.enqueue(&EnqueueEvent {
            plane: PlaneId(0),
            deadline: TickTime::ASAP,
            repeat_count: 0,
        });
        tracer.tick(&TickEvent {
            plane: PlaneId(0),
            now: TickTime(100),
            report: AdvanceReport {
                displayed: true,
                ..AdvanceReport::default()
            },
        });
        tracer.flush(&FlushEvent {
            plane: PlaneId(0),
            released: 1,
        });
        drop(tracer);

        assert_eq!(recorder.len(), 3);
        assert!(matches!(recorder.events()[0], RecordedEvent::Enqueue(_)));
        let RecordedEvent::Tick(tick) = recorder.events()[1] else {
            panic!("second event must be the tick");
        };
        assert!(tick.report.displayed);
        assert!(matches!(
            recorder.events()[2],
            RecordedEvent::Flush(FlushEvent { released: 1, .. })
        ));
    }
}
