// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated vsync driving for scanout tests and demos.
//!
//! Real queues run off a hardware vsync; everything here replaces that
//! hardware with deterministic, manually-stepped stand-ins:
//!
//! - [`ManualClock`] / [`ManualTimingSource`] — settable clock and tick
//!   generator implementing the core timing contracts.
//! - [`RecordingPresenter`] — a [`FramePresenter`] double that records
//!   enable/program/disable transitions (and logs them via `log`).
//! - [`CallbackJournal`] — builds nodes whose hooks append to a shared
//!   list, for asserting on exact `on_displayed`/`on_completed` order.
//! - [`TickRunner`] — steps a timing source, drives a frame queue and its
//!   metadata queues, and feeds a [`Tracer`] with the outcome of every
//!   tick.
//!
//! [`FramePresenter`]: scanout_core::presenter::FramePresenter
//! [`Tracer`]: scanout_core::trace::Tracer

mod clock;
mod journal;
mod presenter;

pub use clock::{ManualClock, ManualTimingSource};
pub use journal::{CallbackJournal, JournalEvent};
pub use presenter::{PresenterEvent, RecordingPresenter};

use std::sync::Arc;

use scanout_core::frame_queue::{AdvanceReport, FrameQueue};
use scanout_core::metadata::{MetadataItem, MetadataQueue};
use scanout_core::presenter::FramePresenter;
use scanout_core::timing::TimingSource;
use scanout_core::trace::{MetadataDeliveryEvent, TickEvent, Tracer};

/// Drives queues from a [`ManualTimingSource`], one tick at a time.
#[derive(Debug)]
pub struct TickRunner {
    timing: Arc<ManualTimingSource>,
}

impl TickRunner {
    /// Creates a runner stepping `timing`.
    #[must_use]
    pub fn new(timing: Arc<ManualTimingSource>) -> Self {
        Self { timing }
    }

    /// Returns the timing source being stepped.
    #[must_use]
    pub fn timing(&self) -> &Arc<ManualTimingSource> {
        &self.timing
    }

    /// Advances the timeline one tick and runs the queue's schedule,
    /// reporting the outcome to `tracer`.
    pub fn step<B, P: FramePresenter<B>>(
        &self,
        queue: &mut FrameQueue<B>,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) -> AdvanceReport {
        let tick = self.timing.step();
        let report = queue.advance(tick, presenter);
        tracer.tick(&TickEvent {
            plane: queue.plane(),
            now: tick.now,
            report,
        });
        report
    }

    /// Delivers the metadata item due at the last stepped tick, if any,
    /// reporting a delivery to `tracer`.
    pub fn pop_metadata(
        &self,
        queue: &mut MetadataQueue,
        tracer: &mut Tracer<'_>,
    ) -> Option<Arc<MetadataItem>> {
        let tick = self.timing.last_tick();
        let item = queue.pop_ready(tick)?;
        tracer.metadata_delivery(&MetadataDeliveryEvent {
            kind: item.kind,
            deadline: item.deadline,
            delivered_at: tick.now,
        });
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanout_core::frame_queue::FrameQueueConfig;
    use scanout_core::metadata::{MetadataKind, MetadataQueueConfig};
    use scanout_core::registry::DeviceRegistry;
    use scanout_core::time::{Duration, TickTime};
    use scanout_core::trace::TraceSink;

    #[derive(Default)]
    struct CollectingSink {
        ticks: Vec<TickEvent>,
        deliveries: Vec<MetadataDeliveryEvent>,
    }

    impl TraceSink for CollectingSink {
        fn on_tick(&mut self, e: &TickEvent) {
            self.ticks.push(*e);
        }

        fn on_metadata_delivery(&mut self, e: &MetadataDeliveryEvent) {
            self.deliveries.push(*e);
        }
    }

    #[test]
    fn runner_drives_schedule_and_traces_outcomes() {
        let timing = ManualTimingSource::new(TickTime(90), Duration(10));
        let runner = TickRunner::new(Arc::clone(&timing));
        let journal = CallbackJournal::new();
        let mut registry = DeviceRegistry::new(ManualClock::new(TickTime(0)));
        let (mut queue, mut producer) =
            FrameQueue::create(&mut registry, 2, FrameQueueConfig::DEFAULT)
                .expect("queue creation");
        let mut presenter = RecordingPresenter::default();
        let mut sink = CollectingSink::default();

        producer
            .enqueue(journal.node(1_u32, "N1").repeat(1))
            .expect("fits");
        producer
            .enqueue(journal.node(2_u32, "N2").repeat(1))
            .expect("fits");

        let mut tracer = Tracer::new(&mut sink);
        for _ in 0..4 {
            runner.step(&mut queue, &mut presenter, &mut tracer);
        }
        drop(tracer);

        assert_eq!(journal.displayed(), ["N1", "N2"]);
        assert_eq!(sink.ticks.len(), 4);
        assert_eq!(sink.ticks[0].now, TickTime(100));
        assert!(sink.ticks[0].report.displayed, "N1 visible on the first tick");
        assert!(sink.ticks[1].report.held, "N1 repeats on the second tick");
        assert!(sink.ticks[2].report.displayed, "N2 visible on the third tick");

        assert_eq!(
            presenter.events()[..2],
            [
                PresenterEvent::Enabled,
                PresenterEvent::Programmed {
                    deadline: TickTime::ASAP
                }
            ]
        );
    }

    #[test]
    fn runner_delivers_due_metadata_with_trace() {
        let timing = ManualTimingSource::new(TickTime(90), Duration(10));
        let runner = TickRunner::new(Arc::clone(&timing));
        let registry = DeviceRegistry::new(ManualClock::new(TickTime(0)));
        let (mut queue, mut metadata_producer) = MetadataQueue::create(
            &registry,
            MetadataKind::PictureInfo,
            4,
            MetadataQueueConfig::DEFAULT,
        )
        .expect("queue creation");

        metadata_producer
            .enqueue(&Arc::new(MetadataItem::new(
                MetadataKind::PictureInfo,
                TickTime(120),
                vec![1_u8, 2, 3],
            )))
            .expect("accepted");

        let mut sink = CollectingSink::default();
        let mut tracer = Tracer::new(&mut sink);

        timing.step(); // 100: not due (window reaches 105)
        assert!(runner.pop_metadata(&mut queue, &mut tracer).is_none());
        timing.step(); // 110: not due (window reaches 115)
        assert!(runner.pop_metadata(&mut queue, &mut tracer).is_none());
        timing.step(); // 120: due
        let item = runner
            .pop_metadata(&mut queue, &mut tracer)
            .expect("due at 120");
        assert_eq!(item.deadline, TickTime(120));
        drop(tracer);

        assert_eq!(sink.deliveries.len(), 1);
        assert_eq!(sink.deliveries[0].delivered_at, TickTime(120));
    }
}
