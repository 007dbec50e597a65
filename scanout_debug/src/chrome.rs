// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format export.
//!
//! [`export`] turns a [`RecorderSink`](crate::recorder::RecorderSink)
//! recording into the JSON object format understood by `chrome://tracing`
//! and Perfetto. Planes map to track ids; timestamps are converted to
//! microseconds through the supplied [`Timebase`].

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;
use scanout_core::time::{TickTime, Timebase};

fn micros(t: TickTime, timebase: Timebase) -> u64 {
    t.to_nanos(timebase) / 1_000
}

/// Converts a recording into a Chrome Trace Event Format JSON document.
#[must_use]
pub fn export(events: &[RecordedEvent], timebase: Timebase) -> Value {
    let mut trace_events = Vec::with_capacity(events.len());
    for event in events {
        match event {
            RecordedEvent::Enqueue(e) => trace_events.push(json!({
                "name": "enqueue",
                "ph": "i",
                "s": "t",
                "ts": micros(e.deadline, timebase),
                "pid": e.plane.0,
                "tid": 0,
                "args": { "repeat": e.repeat_count },
            })),
            RecordedEvent::Tick(e) => trace_events.push(json!({
                "name": "tick",
                "ph": "i",
                "s": "t",
                "ts": micros(e.now, timebase),
                "pid": e.plane.0,
                "tid": 0,
                "args": {
                    "programmed": e.report.programmed,
                    "held": e.report.held,
                    "displayed": e.report.displayed,
                    "retired": e.report.retired,
                    "deactivated": e.report.deactivated,
                },
            })),
            RecordedEvent::Pause(e) => trace_events.push(json!({
                "name": "pause",
                "ph": "i",
                "s": "p",
                "ts": 0,
                "pid": e.plane.0,
                "tid": 0,
                "args": { "flushed": e.flushed },
            })),
            RecordedEvent::Resume(e) => trace_events.push(json!({
                "name": "resume",
                "ph": "i",
                "s": "p",
                "ts": 0,
                "pid": e.plane.0,
                "tid": 0,
            })),
            RecordedEvent::Flush(e) => trace_events.push(json!({
                "name": "flush",
                "ph": "i",
                "s": "p",
                "ts": 0,
                "pid": e.plane.0,
                "tid": 0,
                "args": { "released": e.released },
            })),
            RecordedEvent::MetadataDelivery(e) => trace_events.push(json!({
                "name": "metadata",
                "ph": "i",
                "s": "t",
                "ts": micros(e.delivered_at, timebase),
                "pid": u32::MAX,
                "tid": 0,
                "args": { "kind": format!("{:?}", e.kind) },
            })),
        }
    }

    json!({
        "traceEvents": trace_events,
        "displayTimeUnit": "ms",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanout_core::frame_queue::AdvanceReport;
    use scanout_core::registry::PlaneId;
    use scanout_core::trace::TickEvent;

    #[test]
    fn export_produces_trace_events() {
        let events = [RecordedEvent::Tick(TickEvent {
            plane: PlaneId(1),
            now: TickTime(2_000_000),
            report: AdvanceReport {
                displayed: true,
                ..AdvanceReport::default()
            },
        })];

        let doc = export(&events, Timebase::NANOS);
        let trace_events = doc["traceEvents"]
            .as_array()
            .expect("traceEvents is an array");
        assert_eq!(trace_events.len(), 1);
        assert_eq!(trace_events[0]["name"], "tick");
        assert_eq!(trace_events[0]["ts"], 2_000);
        assert_eq!(trace_events[0]["pid"], 1);
        assert_eq!(trace_events[0]["args"]["displayed"], true);
    }

    #[test]
    fn empty_recording_exports_empty_document() {
        let doc = export(&[], Timebase::NANOS);
        assert_eq!(
            doc["traceEvents"].as_array().map(Vec::len),
            Some(0),
            "no events, no entries"
        );
    }
}
