// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A presenter double that records instead of programming hardware.

use log::debug;

use scanout_core::node::FrameNode;
use scanout_core::presenter::{FramePresenter, PlaneCapabilities};
use scanout_core::time::TickTime;

/// One observed presenter transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenterEvent {
    /// The plane was turned on.
    Enabled,
    /// The plane was turned off.
    Disabled,
    /// Partially built hardware state was dropped.
    Reset,
    /// A node was programmed for the next tick.
    Programmed {
        /// The programmed node's presentation deadline.
        deadline: TickTime,
    },
}

/// A [`FramePresenter`] that records every hook invocation.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Vec<PresenterEvent>,
    caps: PlaneCapabilities,
}

impl RecordingPresenter {
    /// Creates a recorder advertising the given capabilities.
    #[must_use]
    pub fn with_capabilities(caps: PlaneCapabilities) -> Self {
        Self {
            events: Vec::new(),
            caps,
        }
    }

    /// Returns the recorded transitions, oldest first.
    #[must_use]
    pub fn events(&self) -> &[PresenterEvent] {
        &self.events
    }

    /// Forgets all recorded transitions.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<B> FramePresenter<B> for RecordingPresenter {
    fn program(&mut self, node: &FrameNode<B>) {
        debug!(
            "program node deadline={:?} repeat={}",
            node.presentation_deadline(),
            node.repeat_count()
        );
        self.events.push(PresenterEvent::Programmed {
            deadline: node.presentation_deadline(),
        });
    }

    fn enable(&mut self) {
        debug!("plane enabled");
        self.events.push(PresenterEvent::Enabled);
    }

    fn disable(&mut self) {
        debug!("plane disabled");
        self.events.push(PresenterEvent::Disabled);
    }

    fn reset_queue_state(&mut self) {
        debug!("queue state reset");
        self.events.push(PresenterEvent::Reset);
    }

    fn capabilities(&self) -> PlaneCapabilities {
        self.caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_hooks_in_order() {
        let mut presenter = RecordingPresenter::default();
        FramePresenter::<u32>::enable(&mut presenter);
        presenter.program(&FrameNode::new(7_u32).deadline(TickTime(50)));
        FramePresenter::<u32>::disable(&mut presenter);

        assert_eq!(
            presenter.events(),
            [
                PresenterEvent::Enabled,
                PresenterEvent::Programmed {
                    deadline: TickTime(50)
                },
                PresenterEvent::Disabled,
            ]
        );
    }
}
