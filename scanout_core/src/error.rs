// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for the presentation queues.
//!
//! Every condition here is reported synchronously to the caller, who owns
//! the policy (drop the frame, wait, log); nothing in this crate retries
//! internally. `advance` and `pop_ready` doing nothing is the common case
//! and is not an error.

use crate::metadata::MetadataKind;
use crate::node::FrameNode;
use thiserror::Error;

/// Queue construction failures. Fatal to that queue instance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateError {
    /// The ring must hold at least one node.
    #[error("ring capacity must be at least 1")]
    ZeroCapacity,
    /// Backing storage for the ring cannot be obtained.
    #[error("queue backing storage could not be allocated")]
    OutOfMemory,
}

/// Frame enqueue rejection. Transient; the rejected node is handed back so
/// its buffer resource is never lost.
#[derive(Error)]
pub enum EnqueueError<B> {
    /// The ring's write cursor would overtake the read cursor.
    #[error("frame ring is full")]
    QueueFull(FrameNode<B>),
}

impl<B> EnqueueError<B> {
    /// Recovers the rejected node.
    #[must_use]
    pub fn into_node(self) -> FrameNode<B> {
        match self {
            Self::QueueFull(node) => node,
        }
    }
}

impl<B> core::fmt::Debug for EnqueueError<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::QueueFull(_) => f.debug_tuple("QueueFull").finish_non_exhaustive(),
        }
    }
}

/// Metadata enqueue rejections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataEnqueueError {
    /// The item's kind disagrees with the queue's kind. Caller programming
    /// error; surfaced immediately.
    #[error("metadata kind {item:?} does not match queue kind {queue:?}")]
    TypeMismatch {
        /// Kind the queue was created with.
        queue: MetadataKind,
        /// Kind of the rejected item.
        item: MetadataKind,
    },
    /// The deadline is already unreachable, or not later than the previously
    /// accepted deadline.
    #[error("metadata deadline is in the past or not monotonically increasing")]
    TimestampInPast,
    /// The ring slot at the write cursor is still occupied.
    #[error("metadata ring is full")]
    QueueBusy,
}
