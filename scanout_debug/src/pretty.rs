// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable one-line-per-event output.

use scanout_core::trace::{
    EnqueueEvent, FlushEvent, MetadataDeliveryEvent, PauseEvent, ResumeEvent, TickEvent,
    TraceSink,
};

/// A [`TraceSink`] that formats each event as one line of text.
#[derive(Debug, Default)]
pub struct PrettySink {
    lines: Vec<String>,
}

impl PrettySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the formatted lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl TraceSink for PrettySink {
    fn on_enqueue(&mut self, e: &EnqueueEvent) {
        self.lines.push(format!(
            "plane {} enqueue deadline={} repeat={}",
            e.plane.0,
            e.deadline.ticks(),
            e.repeat_count
        ));
    }

    fn on_tick(&mut self, e: &TickEvent) {
        let r = e.report;
        let mut what = Vec::new();
        if r.programmed {
            what.push("programmed");
        }
        if r.held {
            what.push("held");
        }
        if r.displayed {
            what.push("displayed");
        }
        if r.deactivated {
            what.push("deactivated");
        }
        let what = if what.is_empty() {
            "idle".to_owned()
        } else {
            what.join("+")
        };
        self.lines.push(format!(
            "plane {} tick @{} {what} retired={}",
            e.plane.0,
            e.now.ticks(),
            r.retired
        ));
    }

    fn on_pause(&mut self, e: &PauseEvent) {
        let suffix = if e.flushed { " (flushed)" } else { "" };
        self.lines
            .push(format!("plane {} pause{suffix}", e.plane.0));
    }

    fn on_resume(&mut self, e: &ResumeEvent) {
        self.lines.push(format!("plane {} resume", e.plane.0));
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        self.lines.push(format!(
            "plane {} flush released={}",
            e.plane.0, e.released
        ));
    }

    fn on_metadata_delivery(&mut self, e: &MetadataDeliveryEvent) {
        self.lines.push(format!(
            "metadata {:?} delivered @{} deadline={}",
            e.kind,
            e.delivered_at.ticks(),
            e.deadline.ticks()
        ));
    }
}
