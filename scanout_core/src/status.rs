// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Advisory queue status word.
//!
//! [`QueueStatus`] is the observational bitmask reported by status queries
//! and stamped into completion callbacks. It is advisory: nothing in the
//! slot state machine reads it to make a decision, so a stale snapshot seen
//! by a racing status query is harmless.
//!
//! The word is shared between the producer handle, the consumer handle, and
//! any number of [`StatusHandle`] clones. Writers hold [`StatusCell`]'s
//! lightweight lock for a handful of instructions; the lock is never held
//! across a callback, so completion hooks can themselves enqueue new work
//! without deadlock.

use core::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Bitmask of advisory per-queue conditions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QueueStatus(u32);

impl QueueStatus {
    /// No bits set.
    pub const EMPTY: Self = Self(0);
    /// The plane is connected to a display output.
    pub const CONNECTED: Self = Self(1 << 0);
    /// The plane is held for exclusive use by one owner.
    pub const LOCKED: Self = Self(1 << 1);
    /// The queue holds or is displaying work.
    pub const ACTIVE: Self = Self(1 << 2);
    /// The plane is contributing pixels to the output.
    pub const VISIBLE: Self = Self(1 << 3);
    /// Presentation is paused.
    pub const PAUSED: Self = Self(1 << 4);
    /// The ring has no free slot for another enqueue.
    pub const FULL: Self = Self(1 << 5);

    /// Returns the raw bit pattern.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` when every bit of `other` is set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` when no bits are set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the union of two status words.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `self` with the bits of `other` removed.
    #[inline]
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl fmt::Debug for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(QueueStatus, &str); 6] = [
            (QueueStatus::CONNECTED, "CONNECTED"),
            (QueueStatus::LOCKED, "LOCKED"),
            (QueueStatus::ACTIVE, "ACTIVE"),
            (QueueStatus::VISIBLE, "VISIBLE"),
            (QueueStatus::PAUSED, "PAUSED"),
            (QueueStatus::FULL, "FULL"),
        ];

        write!(f, "QueueStatus(")?;
        let mut first = true;
        for (bit, name) in NAMES {
            if self.contains(bit) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        if first {
            write!(f, "EMPTY")?;
        }
        write!(f, ")")
    }
}

/// Shared storage for a queue's status word.
///
/// The mutex is uncontended in practice (writers flip a few bits) and is
/// only ever held for the duration of the bit operation.
#[derive(Debug)]
pub(crate) struct StatusCell {
    word: Mutex<QueueStatus>,
}

impl StatusCell {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            word: Mutex::new(QueueStatus::EMPTY),
        })
    }

    /// Returns a snapshot of the status word.
    pub(crate) fn load(&self) -> QueueStatus {
        *self.word.lock()
    }

    /// Sets the bits of `set`.
    pub(crate) fn insert(&self, set: QueueStatus) {
        let mut word = self.word.lock();
        *word = word.union(set);
    }

    /// Clears the bits of `clear`.
    pub(crate) fn remove(&self, clear: QueueStatus) {
        let mut word = self.word.lock();
        *word = word.difference(clear);
    }

    /// Sets and clears bits in one lock acquisition.
    pub(crate) fn set_and_clear(&self, set: QueueStatus, clear: QueueStatus) {
        let mut word = self.word.lock();
        *word = word.difference(clear).union(set);
    }
}

/// Cloneable handle for reading a queue's status from any task context.
#[derive(Clone, Debug)]
pub struct StatusHandle {
    cell: Arc<StatusCell>,
}

impl StatusHandle {
    pub(crate) fn new(cell: Arc<StatusCell>) -> Self {
        Self { cell }
    }

    /// Returns a snapshot of the queue's status word.
    #[must_use]
    pub fn get(&self) -> QueueStatus {
        self.cell.load()
    }
}
