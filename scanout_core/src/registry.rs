// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device registry and identifiers.
//!
//! A [`DeviceRegistry`] is the explicit per-device object that hands out
//! plane identifiers and records plane capabilities. Queue lifetimes are
//! tied to the registry their constructor received, not to process-wide
//! tables or static instance counters. The registry also carries the
//! device's free-running [`ClockSource`], which metadata queues fall back
//! to when no timing source is attached.

use core::fmt;
use std::sync::Arc;

use crate::presenter::PlaneCapabilities;
use crate::timing::ClockSource;

/// Identifies one hardware plane of a display device.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlaneId(pub u32);

impl fmt::Debug for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlaneId({})", self.0)
    }
}

/// Identifies a display output or mixer a plane can be shown on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OutputId(pub u32);

impl fmt::Debug for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputId({})", self.0)
    }
}

/// Per-device registry of planes and the device clock.
pub struct DeviceRegistry {
    clock: Arc<dyn ClockSource + Send + Sync>,
    planes: Vec<PlaneCapabilities>,
}

impl DeviceRegistry {
    /// Creates a registry for a device whose free-running clock is `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn ClockSource + Send + Sync>) -> Self {
        Self {
            clock,
            planes: Vec::new(),
        }
    }

    /// Allocates the next plane identifier and records its capabilities.
    pub fn register_plane(&mut self, caps: PlaneCapabilities) -> PlaneId {
        let id = PlaneId(u32::try_from(self.planes.len()).unwrap_or(u32::MAX));
        self.planes.push(caps);
        id
    }

    /// Returns the capabilities recorded for `plane`, if registered here.
    #[must_use]
    pub fn capabilities(&self, plane: PlaneId) -> Option<&PlaneCapabilities> {
        self.planes.get(plane.0 as usize)
    }

    /// Returns the number of registered planes.
    #[must_use]
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Returns the device's free-running clock.
    #[must_use]
    pub fn clock(&self) -> Arc<dyn ClockSource + Send + Sync> {
        Arc::clone(&self.clock)
    }
}

impl fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("planes", &self.planes)
            .finish_non_exhaustive()
    }
}
